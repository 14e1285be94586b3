pub mod application;
pub mod connector;
pub mod domain;
pub mod presentation;

pub use application::{
    ChatClient, CompletionRequest, ConditionsSearcher, SearchConditionsUseCase,
    SuggestCitiesUseCase, SuggestionFetcher,
};

pub use connector::{AzureOpenAiClient, AzureOpenAiConfig, ScriptedChatClient, ScriptedReply};

pub use domain::{
    ConditionLevel, DomainError, ParseFailure, ParseFailureKind, Query, QueryKind, SearchRange,
    SlopeRecord, SlopeStatus, SuggestionList,
};

pub use presentation::{AppController, AppEvent, SearchState, SuggestionState, ValidationError};
