use crate::modules::content::domain::entities::Theme;

/// Outgoing port for global presentation state.
///
/// The theme has process-wide lifecycle: applied on load, overwritten on every
/// remote theme update, never torn down. Keeping the side effect behind this
/// port means exactly one subscriber (the content store) touches presentation
/// state; everything else reads through the adapter.
pub trait ThemeSink: Send + Sync {
    /// Must apply synchronously: callers rely on the new colors being visible
    /// before the corresponding remote write resolves.
    fn apply(&self, theme: &Theme);
}
