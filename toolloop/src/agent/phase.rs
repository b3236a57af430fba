//! Dispatcher phases and their transitions.

use super::Route;

/// Where the dispatcher loop stands.
///
/// `AwaitingModel → AwaitingTool | Done` by the route of the model's reply,
/// `AwaitingTool → AwaitingModel` always, `Done` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    AwaitingModel,
    AwaitingTool,
    Done,
}

impl Phase {
    /// Next phase. `route` is only consulted in `AwaitingModel`.
    pub fn advance(self, route: Route) -> Phase {
        match (self, route) {
            (Phase::AwaitingModel, Route::InvokeTool) => Phase::AwaitingTool,
            (Phase::AwaitingModel, Route::Terminate) => Phase::Done,
            (Phase::AwaitingTool, _) => Phase::AwaitingModel,
            (Phase::Done, _) => Phase::Done,
        }
    }

    pub fn is_done(self) -> bool {
        self == Phase::Done
    }
}
