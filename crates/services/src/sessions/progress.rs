/// Aggregated view of session progress, useful for UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionProgress {
    pub total: usize,
    pub resolved: usize,
    pub remaining: usize,
    pub correct: u32,
    pub incorrect: u32,
    pub is_finished: bool,
}
