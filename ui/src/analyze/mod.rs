//! Upload & analyze workflow: image selection, sequential submission to the
//! classification endpoint, result accumulation.

pub mod queue;

mod view;
pub use view::AnalyzePanel;
