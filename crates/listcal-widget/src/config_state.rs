//! Configuration resolution.
//!
//! Choosing a calendar source is a chain of dependent lookups: sites, then
//! the lists of the chosen site, then the columns of the chosen list. The
//! chain is modelled as an explicit state machine:
//!
//! ```text
//! Unconfigured ──site──▶ SiteSelected ──list──▶ ListSelected ──columns──▶ ColumnsResolved
//!      ▲                      │                                                │
//!      └────── "Other" ───────┴────────────────────────────────────────────────┘
//! ```
//!
//! [`resolve`] is a pure function from the current state and one input to
//! the next state plus the gateway call (if any) the host should issue next.
//! [`ConfigResolver`] runs the machine against a [`DataSourceGateway`].

use listcal_providers::{ColumnInfo, DataSourceGateway, ListInfo, SiteInfo, SourceResult};
use serde::Serialize;
use tracing::debug;

use crate::widget::SourceLocator;

/// Key of the site option that reveals the alternate URL input.
pub const OTHER_SITE_KEY: &str = "other";

/// Label of the current-site option.
pub const THIS_SITE_LABEL: &str = "This Site";

/// Label of the alternate-site option.
pub const OTHER_SITE_LABEL: &str = "Other Site (Specify Url)";

/// An alternate URL is only looked up once it has more characters than this.
pub const MIN_OTHER_SITE_URL_LEN: usize = 25;

/// Progress through source selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ConfigStage {
    #[default]
    Unconfigured,
    SiteSelected {
        site_url: String,
        lists: Vec<ListInfo>,
    },
    ListSelected {
        site_url: String,
        lists: Vec<ListInfo>,
        list_title: String,
    },
    ColumnsResolved {
        site_url: String,
        lists: Vec<ListInfo>,
        list_title: String,
        columns: Vec<ColumnInfo>,
    },
}

/// Full configuration state: the stage plus the caches shared by every stage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigState {
    pub stage: ConfigStage,
    /// Sites known so far.
    pub sites: Vec<SiteInfo>,
    /// Whether "Other Site" is chosen and its URL input visible.
    pub alternate_source: bool,
    /// Text typed into the alternate URL input.
    pub alternate_url: Option<String>,
}

/// A site dropdown choice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SiteChoice {
    /// The site hosting the widget.
    ThisSite(String),
    /// Reveal the alternate URL input.
    Other,
    /// A discovered site.
    Url(String),
}

impl SiteChoice {
    /// Maps a dropdown key back to a choice.
    pub fn from_key(key: &str, current_web_url: &str) -> Self {
        if key == OTHER_SITE_KEY {
            Self::Other
        } else if same_site(key, current_web_url) {
            Self::ThisSite(key.to_string())
        } else {
            Self::Url(key.to_string())
        }
    }
}

/// One thing that happened while configuring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigInput {
    SitesLoaded(Vec<SiteInfo>),
    SiteChosen(SiteChoice),
    OtherSiteUrlEntered(String),
    ListsLoaded(Vec<ListInfo>),
    ListChosen(String),
    ColumnsLoaded(Vec<ColumnInfo>),
}

/// A gateway call the host must make next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigEffect {
    LoadLists { site_url: String },
    LoadColumns { list_title: String, site_url: String },
}

/// Result of [`resolve`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub state: ConfigState,
    pub effect: Option<ConfigEffect>,
}

impl Transition {
    fn stay(state: ConfigState) -> Self {
        Self {
            state,
            effect: None,
        }
    }
}

/// An entry of the site dropdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SiteOption {
    pub key: String,
    pub text: String,
}

impl ConfigState {
    /// Site the current stage points at, if any.
    pub fn site_url(&self) -> Option<&str> {
        match self.stage {
            ConfigStage::Unconfigured => None,
            ConfigStage::SiteSelected { ref site_url, .. }
            | ConfigStage::ListSelected { ref site_url, .. }
            | ConfigStage::ColumnsResolved { ref site_url, .. } => Some(site_url.as_str()),
        }
    }

    /// Chosen list, if any.
    pub fn list_title(&self) -> Option<&str> {
        match self.stage {
            ConfigStage::ListSelected { ref list_title, .. }
            | ConfigStage::ColumnsResolved { ref list_title, .. } => Some(list_title.as_str()),
            _ => None,
        }
    }

    /// Lists of the selected site.
    pub fn lists(&self) -> &[ListInfo] {
        match self.stage {
            ConfigStage::Unconfigured => &[],
            ConfigStage::SiteSelected { ref lists, .. }
            | ConfigStage::ListSelected { ref lists, .. }
            | ConfigStage::ColumnsResolved { ref lists, .. } => lists.as_slice(),
        }
    }

    /// Columns of the selected list, once resolved.
    pub fn columns(&self) -> &[ColumnInfo] {
        match self.stage {
            ConfigStage::ColumnsResolved { ref columns, .. } => columns.as_slice(),
            _ => &[],
        }
    }

    /// Whether the alternate URL input should be shown.
    pub fn alternate_source_visible(&self) -> bool {
        self.alternate_source
    }

    /// Builds the source locator once a list is chosen.
    pub fn source_locator(&self) -> Option<SourceLocator> {
        let site_url = self.site_url()?;
        let list_title = self.list_title()?;
        Some(if self.alternate_source {
            SourceLocator {
                site: None,
                other: true,
                site_other: Some(site_url.to_string()),
                list_title: Some(list_title.to_string()),
            }
        } else {
            SourceLocator {
                site: Some(site_url.to_string()),
                other: false,
                site_other: None,
                list_title: Some(list_title.to_string()),
            }
        })
    }
}

/// Computes the next configuration state.
///
/// Inputs that do not apply to the current stage (for example columns
/// arriving after the user already picked another list) leave the state
/// unchanged.
pub fn resolve(state: ConfigState, input: ConfigInput) -> Transition {
    let mut state = state;
    match input {
        ConfigInput::SitesLoaded(sites) => {
            state.sites = sites;
            Transition::stay(state)
        }
        ConfigInput::SiteChosen(SiteChoice::Other) => {
            state.alternate_source = true;
            state.alternate_url = None;
            state.stage = ConfigStage::Unconfigured;
            Transition::stay(state)
        }
        ConfigInput::SiteChosen(SiteChoice::ThisSite(url) | SiteChoice::Url(url)) => {
            state.alternate_source = false;
            state.alternate_url = None;
            select_site(state, url)
        }
        ConfigInput::OtherSiteUrlEntered(url) => {
            if !state.alternate_source {
                debug!("alternate URL entered while hidden, ignoring");
                return Transition::stay(state);
            }
            let url = url.trim().to_string();
            state.alternate_url = Some(url.clone());
            if url.chars().count() > MIN_OTHER_SITE_URL_LEN {
                select_site(state, url)
            } else {
                state.stage = ConfigStage::Unconfigured;
                Transition::stay(state)
            }
        }
        ConfigInput::ListsLoaded(loaded) => {
            if let ConfigStage::SiteSelected { ref mut lists, .. } = state.stage {
                *lists = loaded;
            }
            Transition::stay(state)
        }
        ConfigInput::ListChosen(list_title) => {
            let current = std::mem::take(&mut state.stage);
            let (site_url, lists) = match current {
                ConfigStage::Unconfigured => return Transition::stay(state),
                ConfigStage::SiteSelected { site_url, lists }
                | ConfigStage::ListSelected { site_url, lists, .. }
                | ConfigStage::ColumnsResolved { site_url, lists, .. } => (site_url, lists),
            };
            let effect = ConfigEffect::LoadColumns {
                list_title: list_title.clone(),
                site_url: site_url.clone(),
            };
            state.stage = ConfigStage::ListSelected {
                site_url,
                lists,
                list_title,
            };
            Transition {
                state,
                effect: Some(effect),
            }
        }
        ConfigInput::ColumnsLoaded(columns) => {
            let current = std::mem::take(&mut state.stage);
            state.stage = match current {
                ConfigStage::ListSelected {
                    site_url,
                    lists,
                    list_title,
                } => ConfigStage::ColumnsResolved {
                    site_url,
                    lists,
                    list_title,
                    columns,
                },
                other => other,
            };
            Transition::stay(state)
        }
    }
}

fn select_site(mut state: ConfigState, site_url: String) -> Transition {
    state.stage = ConfigStage::SiteSelected {
        site_url: site_url.clone(),
        lists: Vec::new(),
    };
    Transition {
        state,
        effect: Some(ConfigEffect::LoadLists { site_url }),
    }
}

fn same_site(a: &str, b: &str) -> bool {
    a.trim_end_matches('/').eq_ignore_ascii_case(b.trim_end_matches('/'))
}

/// Builds the site dropdown: this site, the alternate entry, then every
/// other known site.
pub fn site_options(current_web_url: &str, sites: &[SiteInfo]) -> Vec<SiteOption> {
    let mut options = vec![
        SiteOption {
            key: current_web_url.to_string(),
            text: THIS_SITE_LABEL.to_string(),
        },
        SiteOption {
            key: OTHER_SITE_KEY.to_string(),
            text: OTHER_SITE_LABEL.to_string(),
        },
    ];
    options.extend(
        sites
            .iter()
            .filter(|site| !same_site(&site.url, current_web_url))
            .map(|site| SiteOption {
                key: site.url.clone(),
                text: site.title.clone(),
            }),
    );
    options
}

/// Drives [`resolve`] against a gateway, issuing every effect it asks for.
pub struct ConfigResolver<G> {
    gateway: G,
    current_web_url: String,
    state: ConfigState,
}

impl<G: DataSourceGateway> ConfigResolver<G> {
    /// Creates a resolver for a widget hosted on `current_web_url`.
    pub fn new(gateway: G, current_web_url: impl Into<String>) -> Self {
        Self {
            gateway,
            current_web_url: current_web_url.into(),
            state: ConfigState::default(),
        }
    }

    pub fn state(&self) -> &ConfigState {
        &self.state
    }

    pub fn into_state(self) -> ConfigState {
        self.state
    }

    /// Site dropdown entries for the current state.
    pub fn site_options(&self) -> Vec<SiteOption> {
        site_options(&self.current_web_url, &self.state.sites)
    }

    /// Discovers the available sites.
    pub async fn load_sites(&mut self) -> SourceResult<&ConfigState> {
        let sites = self.gateway.list_sites().await?;
        debug!("discovered {} sites", sites.len());
        self.apply(ConfigInput::SitesLoaded(sites)).await
    }

    /// Chooses a site by dropdown key.
    pub async fn choose_site(&mut self, key: &str) -> SourceResult<&ConfigState> {
        let choice = SiteChoice::from_key(key, &self.current_web_url);
        self.apply(ConfigInput::SiteChosen(choice)).await
    }

    /// Feeds one input and performs the resulting gateway calls.
    pub async fn apply(&mut self, input: ConfigInput) -> SourceResult<&ConfigState> {
        let mut next = Some(input);
        while let Some(input) = next.take() {
            let transition = resolve(std::mem::take(&mut self.state), input);
            self.state = transition.state;
            next = match transition.effect {
                None => None,
                Some(ConfigEffect::LoadLists { site_url }) => {
                    let lists = self.gateway.list_titles(&site_url).await?;
                    debug!(site = %site_url, "loaded {} lists", lists.len());
                    Some(ConfigInput::ListsLoaded(lists))
                }
                Some(ConfigEffect::LoadColumns {
                    list_title,
                    site_url,
                }) => {
                    let columns = self.gateway.list_columns(&list_title, &site_url).await?;
                    debug!(list = %list_title, "loaded {} columns", columns.len());
                    Some(ConfigInput::ColumnsLoaded(columns))
                }
            };
        }
        Ok(&self.state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use listcal_providers::{SourceErrorCode, StaticGateway, StaticList};

    const HOME: &str = "https://contoso.sharepoint.com/sites/home";
    const TEAM: &str = "https://contoso.sharepoint.com/sites/team";

    fn step(state: ConfigState, input: ConfigInput) -> Transition {
        resolve(state, input)
    }

    fn lists() -> Vec<ListInfo> {
        vec![ListInfo::new("Events", "1"), ListInfo::new("Tasks", "2")]
    }

    #[test]
    fn full_walk_through() {
        let t = step(ConfigState::default(), ConfigInput::SiteChosen(SiteChoice::ThisSite(HOME.into())));
        assert_eq!(t.effect, Some(ConfigEffect::LoadLists { site_url: HOME.into() }));
        assert_eq!(t.state.site_url(), Some(HOME));

        let t = step(t.state, ConfigInput::ListsLoaded(lists()));
        assert!(t.effect.is_none());
        assert_eq!(t.state.lists().len(), 2);

        let t = step(t.state, ConfigInput::ListChosen("Events".into()));
        assert_eq!(
            t.effect,
            Some(ConfigEffect::LoadColumns {
                list_title: "Events".into(),
                site_url: HOME.into()
            })
        );

        let t = step(t.state, ConfigInput::ColumnsLoaded(vec![ColumnInfo::new("Title", "Title")]));
        assert!(matches!(t.state.stage, ConfigStage::ColumnsResolved { .. }));
        assert_eq!(t.state.columns().len(), 1);
        assert_eq!(t.state.lists().len(), 2);

        let locator = t.state.source_locator().unwrap();
        assert_eq!(locator.effective_site(), Some(HOME));
        assert_eq!(locator.list_title.as_deref(), Some("Events"));
    }

    #[test]
    fn choosing_other_reveals_input_and_clears_list() {
        let state = ConfigState {
            stage: ConfigStage::ListSelected {
                site_url: HOME.into(),
                lists: lists(),
                list_title: "Events".into(),
            },
            ..Default::default()
        };
        let t = step(state, ConfigInput::SiteChosen(SiteChoice::Other));
        assert!(t.state.alternate_source_visible());
        assert_eq!(t.state.stage, ConfigStage::Unconfigured);
        assert!(t.effect.is_none());
    }

    #[test]
    fn short_alternate_url_does_not_load() {
        let t = step(ConfigState::default(), ConfigInput::SiteChosen(SiteChoice::Other));
        let t = step(t.state, ConfigInput::OtherSiteUrlEntered("https://contoso".into()));
        assert!(t.effect.is_none());
        assert_eq!(t.state.alternate_url.as_deref(), Some("https://contoso"));

        let t = step(t.state, ConfigInput::OtherSiteUrlEntered(TEAM.into()));
        assert_eq!(t.effect, Some(ConfigEffect::LoadLists { site_url: TEAM.into() }));
        assert!(t.state.alternate_source_visible());
    }

    #[test]
    fn alternate_url_length_counts_characters() {
        let t = step(ConfigState::default(), ConfigInput::SiteChosen(SiteChoice::Other));

        // 18 characters, 34 bytes.
        let t = step(t.state, ConfigInput::OtherSiteUrlEntered("https://例え.テスト/サイト".into()));
        assert!(t.effect.is_none());

        // 27 characters.
        let long = "https://例え.テスト/サイト/チーム/イベント";
        let t = step(t.state, ConfigInput::OtherSiteUrlEntered(long.into()));
        assert_eq!(t.effect, Some(ConfigEffect::LoadLists { site_url: long.into() }));
    }

    #[test]
    fn alternate_url_ignored_while_hidden() {
        let t = step(ConfigState::default(), ConfigInput::OtherSiteUrlEntered(TEAM.into()));
        assert!(t.effect.is_none());
        assert_eq!(t.state, ConfigState::default());
    }

    #[test]
    fn leaving_other_hides_input_and_clears_url() {
        let t = step(ConfigState::default(), ConfigInput::SiteChosen(SiteChoice::Other));
        let t = step(t.state, ConfigInput::OtherSiteUrlEntered(TEAM.into()));
        let t = step(t.state, ConfigInput::SiteChosen(SiteChoice::ThisSite(HOME.into())));
        assert!(!t.state.alternate_source_visible());
        assert!(t.state.alternate_url.is_none());
        assert_eq!(t.state.site_url(), Some(HOME));
    }

    #[test]
    fn alternate_locator_uses_site_other() {
        let t = step(ConfigState::default(), ConfigInput::SiteChosen(SiteChoice::Other));
        let t = step(t.state, ConfigInput::OtherSiteUrlEntered(TEAM.into()));
        let t = step(t.state, ConfigInput::ListChosen("Events".into()));
        let locator = t.state.source_locator().unwrap();
        assert!(locator.other);
        assert_eq!(locator.site_other.as_deref(), Some(TEAM));
        assert_eq!(locator.effective_site(), Some(TEAM));
    }

    #[test]
    fn stale_inputs_are_ignored() {
        let t = step(ConfigState::default(), ConfigInput::ListChosen("Events".into()));
        assert!(t.effect.is_none());
        assert_eq!(t.state.stage, ConfigStage::Unconfigured);

        let t = step(t.state, ConfigInput::ColumnsLoaded(vec![ColumnInfo::new("A", "A")]));
        assert_eq!(t.state.stage, ConfigStage::Unconfigured);
    }

    #[test]
    fn site_options_layout() {
        let sites = vec![
            SiteInfo::new("Home", format!("{}/", HOME)),
            SiteInfo::new("Team", TEAM),
        ];
        let options = site_options(HOME, &sites);
        let texts: Vec<&str> = options.iter().map(|o| o.text.as_str()).collect();
        assert_eq!(texts, vec!["This Site", "Other Site (Specify Url)", "Team"]);
        assert_eq!(options[0].key, HOME);
        assert_eq!(options[1].key, "other");
        assert_eq!(options[2].key, TEAM);
    }

    #[test]
    fn site_choice_from_key() {
        assert_eq!(SiteChoice::from_key("other", HOME), SiteChoice::Other);
        assert_eq!(SiteChoice::from_key(HOME, HOME), SiteChoice::ThisSite(HOME.into()));
        assert_eq!(SiteChoice::from_key(TEAM, HOME), SiteChoice::Url(TEAM.into()));
    }

    fn gateway() -> StaticGateway {
        StaticGateway::new()
            .with_site("Home", HOME)
            .with_site("Team", TEAM)
            .with_list(
                TEAM,
                StaticList::new("Events", "1")
                    .with_column("Title", "Title")
                    .with_column("EventDate", "Start Time"),
            )
    }

    #[tokio::test]
    async fn resolver_walks_gateway() {
        let mut resolver = ConfigResolver::new(gateway(), HOME);
        resolver.load_sites().await.unwrap();
        assert_eq!(resolver.site_options().len(), 3);

        let state = resolver.choose_site(TEAM).await.unwrap();
        assert_eq!(state.lists(), &[ListInfo::new("Events", "1")]);

        let state = resolver
            .apply(ConfigInput::ListChosen("Events".into()))
            .await
            .unwrap();
        assert_eq!(state.columns()[1].title, "Start Time");
        assert!(matches!(state.stage, ConfigStage::ColumnsResolved { .. }));
    }

    #[tokio::test]
    async fn resolver_surfaces_gateway_errors() {
        let mut resolver = ConfigResolver::new(gateway(), HOME);
        let err = resolver.choose_site(HOME).await.unwrap_err();
        assert_eq!(err.code(), SourceErrorCode::NotFound);
    }
}
