pub mod analysis;
pub mod db;
pub mod llm;
pub mod renderer;

pub use analysis::CannedAnalysisAdapter;
pub use db::DbAdapter;
pub use llm::OpenAiAnalysisAdapter;
pub use renderer::TextPageRenderer;
