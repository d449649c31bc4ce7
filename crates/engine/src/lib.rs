pub mod infrastructure;
pub mod prompts;
pub mod use_cases;
