//! Loading indicator shown while a fetch is in flight

use askama::Template;

/// Spinner with the loading caption
#[derive(Debug, Clone, Copy, Default, Template)]
#[template(path = "components/loading.html")]
pub struct LoadingIndicator;

impl LoadingIndicator {
    /// The indicator when something is loading, nothing otherwise
    #[must_use]
    pub fn when(loading: bool) -> Option<Self> {
        loading.then_some(Self)
    }
}
