use userhub_core::services::DirectoryService;

#[derive(Clone)]
pub struct AppState {
    pub directory: DirectoryService,
}

impl AppState {
    pub fn new(directory: DirectoryService) -> Self {
        Self { directory }
    }
}
