pub mod error;
pub mod io;
pub mod llm;
pub mod models;
pub mod pipeline;
pub mod server;
pub mod stages;

pub use error::PetitionError;
pub use io::{describe_failure, read_intake_file, write_petition};
pub use llm::{
    compose, ComposedPrompt, ComposerConfig, GeminiClient, GeminiConfig, TextGenerator,
};
pub use models::{IntakeForm, NormalizedCase, ProblemType, SectionPlan};
pub use pipeline::{PetitionPipeline, PipelineConfig};
pub use server::{create_router, AppState};
pub use stages::{
    normalize, plan, to_result, NormalizeConfig, PetitionResult, ResponseBody, ResponseConfig,
    ValidationPolicy,
};
