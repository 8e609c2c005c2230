pub mod status_poller;
pub mod workbench_usecase;

pub use status_poller::{StatusPoller, StatusUpdate};
pub use workbench_usecase::{GenerateOutcome, WorkbenchUseCase};
