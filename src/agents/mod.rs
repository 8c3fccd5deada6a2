//! Agent System
//!
//! One agent per mode of the lab, each operating on the caller's
//! [`SessionContext`](crate::session::SessionContext):
//!
//! - **Literature Agent**: searches arXiv and stores the results
//! - **Analysis Agent**: summarizes an uploaded PDF with the fast model
//! - **Hypothesis Agent**: drafts a hypothetical experiment with the deep model
//! - **Chat Agent**: answers a chat turn, routed by the **Routing Agent**
//!
//! ## Chat turn
//!
//! ```text
//! User Message
//!      │
//!      ▼
//! ┌─────────────┐
//! │   Routing   │  → fast model names "fast" or "deep"
//! │    Agent    │
//! └─────────────┘
//!      │
//!      ▼
//! ┌─────────────┐
//! │    Chat     │  → chosen model answers with the full transcript
//! │    Agent    │
//! └─────────────┘
//!      │
//!      ▼
//!  Transcript updated
//! ```

pub mod analysis;
pub mod chat;
pub mod hypothesis;
pub mod literature;
pub mod routing;

pub use analysis::{AnalysisAgent, DocumentAnalysis, ANALYSIS_CHAR_LIMIT};
pub use chat::{ChatAgent, ChatTurn, EMPTY_COMPLETION_PLACEHOLDER};
pub use hypothesis::{ExperimentOutline, HypothesisAgent};
pub use literature::LiteratureAgent;
pub use routing::{Classification, RoutingDecision};
