#[derive(Debug, Clone)]
pub enum AppEvent {
    AdvisorReply(String),
    AdvisorFailed(String),
}
