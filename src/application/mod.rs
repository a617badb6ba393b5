/// Application layer: the deploy workflow and read-only inspection
pub mod use_cases;
