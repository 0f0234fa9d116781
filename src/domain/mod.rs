//! Domain layer: dashboard view models, pure transformations, and events.
//!
//! This module contains the server-side domain model: user identity and
//! profile, the auth/subscription gate, the price pivot builder, the map
//! selection sets, prediction validation and fan-in, onboarding drafts, and
//! the event bus that pushes profile changes to WebSocket clients.

pub mod dashboard_event;
pub mod draft_registry;
pub mod event_bus;
pub mod gate;
pub mod onboarding_draft;
pub mod pivot;
pub mod prediction;
pub mod profile;
pub mod selection;
pub mod user_id;

pub use dashboard_event::DashboardEvent;
pub use draft_registry::DraftRegistry;
pub use event_bus::EventBus;
pub use onboarding_draft::OnboardingDraft;
pub use profile::UserProfile;
pub use user_id::UserId;
