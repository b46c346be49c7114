mod credential;
mod media_type;
mod outcome;
mod pet;

pub use credential::{API_KEY_HEADER, AUTHORIZATION_HEADER, Credential};
pub use media_type::MediaType;
pub use outcome::{BodyShape, ExpectedOutcome};
pub use pet::{Category, EncodedBody, FixtureError, Pet, PetStatus, Tag};
