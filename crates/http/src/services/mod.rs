pub mod jwt;
pub mod oracle;

pub use jwt::{JwtConfig, JwtService, SessionClaims};
pub use oracle::{JwtSessionOracle, Session, SessionOracle};
