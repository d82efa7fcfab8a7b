pub mod defs;

pub use defs::{
    CompletionModel, Platform, PostTypeRating, SourceConfig, SourceProvider, SourceType, Story,
    VoiceAnalysis, VoiceProfile, GENERAL_TOPIC, TOPIC_BOOST,
};
