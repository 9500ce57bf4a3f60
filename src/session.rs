use crate::models::DatasetInfo;
use crate::plot::PlotKind;
use crate::preview::PreviewTable;
use crate::stats::StatsSummary;
use std::time::Duration;
use tokio::time::Instant;

/// Handle for one issued request. Only the most recent token of a panel
/// may write to that panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RequestToken(u64);

#[derive(Debug, Default)]
pub struct TokenCounter {
    latest: u64,
}

impl TokenCounter {
    pub fn issue(&mut self) -> RequestToken {
        self.latest += 1;
        RequestToken(self.latest)
    }

    pub fn is_current(&self, token: RequestToken) -> bool {
        token.0 == self.latest
    }
}

#[derive(Debug, Default)]
pub struct PanelTokens {
    pub upload: TokenCounter,
    pub stats: TokenCounter,
    pub preview: TokenCounter,
    pub plot: TokenCounter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Empty,
    Uploading,
    Ready,
}

impl Phase {
    pub fn loading_visible(self) -> bool {
        self == Phase::Uploading
    }

    pub fn dashboard_visible(self) -> bool {
        self == Phase::Ready
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum PanelState<T> {
    #[default]
    Idle,
    Loading,
    Loaded(T),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum PlotPanel {
    #[default]
    Placeholder,
    Generating,
    Image(String),
    Error(String),
    NoImage,
}

/// The dataset the backend currently holds, as last reported to us.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionContext {
    pub info: DatasetInfo,
}

/// Current values of the plot controls.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Controls {
    pub kind: PlotKind,
    pub x_col: Option<String>,
    pub y_col: Option<String>,
}

impl Controls {
    /// Fresh controls for a new dataset: the plot kind is kept, X and Y
    /// default to the first two numeric columns.
    pub fn for_dataset(kind: PlotKind, info: &DatasetInfo) -> Self {
        let (x_col, y_col) = default_selection(info);
        Self { kind, x_col, y_col }
    }
}

pub fn default_selection(info: &DatasetInfo) -> (Option<String>, Option<String>) {
    let mut numeric = info.numeric_columns.iter().cloned();
    let x = numeric.next();
    let y = numeric.next();
    (x, y)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerKind {
    Error,
    Success,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Banner {
    pub id: u64,
    pub kind: BannerKind,
    pub message: String,
    pub expires_at: Instant,
}

/// Banners stacked at the top of the page, newest first. Each one expires
/// after the configured delay unless dismissed earlier.
#[derive(Debug)]
pub struct Banners {
    ttl: Duration,
    next_id: u64,
    items: Vec<Banner>,
}

impl Banners {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            next_id: 1,
            items: Vec::new(),
        }
    }

    pub fn push(&mut self, kind: BannerKind, message: impl Into<String>, now: Instant) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.items.insert(
            0,
            Banner {
                id,
                kind,
                message: message.into(),
                expires_at: now + self.ttl,
            },
        );
        id
    }

    pub fn dismiss(&mut self, id: u64) -> bool {
        let before = self.items.len();
        self.items.retain(|banner| banner.id != id);
        self.items.len() != before
    }

    pub fn prune(&mut self, now: Instant) {
        self.items.retain(|banner| banner.expires_at > now);
    }

    pub fn active(&self, now: Instant) -> Vec<Banner> {
        self.items
            .iter()
            .filter(|banner| banner.expires_at > now)
            .cloned()
            .collect()
    }
}

/// Mutable dashboard state, owned by the controller.
#[derive(Debug)]
pub struct DashboardState {
    pub phase: Phase,
    pub session: Option<SessionContext>,
    pub controls: Controls,
    pub stats: PanelState<StatsSummary>,
    pub preview: PanelState<PreviewTable>,
    pub plot: PlotPanel,
    pub banners: Banners,
    pub tokens: PanelTokens,
}

impl DashboardState {
    pub fn new(banner_ttl: Duration) -> Self {
        Self {
            phase: Phase::Empty,
            session: None,
            controls: Controls::default(),
            stats: PanelState::Idle,
            preview: PanelState::Idle,
            plot: PlotPanel::Placeholder,
            banners: Banners::new(banner_ttl),
            tokens: PanelTokens::default(),
        }
    }

    pub fn snapshot(&mut self, now: Instant) -> DashboardView {
        self.banners.prune(now);
        DashboardView {
            phase: self.phase,
            session: self.session.clone(),
            controls: self.controls.clone(),
            stats: self.stats.clone(),
            preview: self.preview.clone(),
            plot: self.plot.clone(),
            banners: self.banners.active(now),
            taken_at: now,
        }
    }
}

/// Read-only copy of the state handed to the renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub phase: Phase,
    pub session: Option<SessionContext>,
    pub controls: Controls,
    pub stats: PanelState<StatsSummary>,
    pub preview: PanelState<PreviewTable>,
    pub plot: PlotPanel,
    pub banners: Vec<Banner>,
    pub taken_at: Instant,
}
