pub mod claims;
pub mod extractor;
pub mod token;

pub use claims::SessionClaims;
pub use extractor::CurrentSession;
pub use token::SessionTokenService;
