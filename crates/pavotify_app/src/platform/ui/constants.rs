pub const BAR_WIDTH: usize = 30;
pub const EMPTY_HISTORY: &str = "No downloads yet.";
