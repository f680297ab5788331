// src/auth.rs
use anyhow::Result;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use rocket::http::Status;
use rocket::request::{FromRequest, Outcome};
use rocket::{Request, State};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{error, info, warn};

#[derive(Debug, Serialize, Deserialize)]
pub struct FirebaseUser {
    pub uid: String,
    pub email: String,
    pub name: Option<String>,
    pub picture: Option<String>,
    pub email_verified: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub aud: String, // Firebase project ID
    pub iss: String, // Firebase issuer
    pub sub: String, // User ID (uid)
    pub email: String,
    pub name: Option<String>,
    pub picture: Option<String>,
    pub email_verified: bool,
    pub exp: usize,
    pub iat: usize,
}

impl From<Claims> for FirebaseUser {
    fn from(claims: Claims) -> Self {
        Self {
            uid: claims.sub,
            email: claims.email,
            name: claims.name,
            picture: claims.picture,
            email_verified: claims.email_verified,
        }
    }
}

pub struct AuthConfig {
    pub project_id: String,
    pub firebase_keys: HashMap<String, String>, // kid -> public key
}

impl AuthConfig {
    pub fn new(project_id: String) -> Self {
        Self {
            project_id,
            firebase_keys: HashMap::new(),
        }
    }

    /// Fetch Firebase public keys for JWT verification
    pub async fn update_firebase_keys(&mut self) -> Result<()> {
        let url = "https://www.googleapis.com/robot/v1/metadata/x509/securetoken@system.gserviceaccount.com";

        let response = reqwest::get(url).await?;
        let keys: HashMap<String, String> = response.json().await?;

        self.firebase_keys = keys;
        info!("Updated Firebase public keys");

        Ok(())
    }
}

/// Verified caller identity. Metering and exports key off the account email.
pub struct AuthenticatedUser {
    pub user: FirebaseUser,
}

impl AuthenticatedUser {
    pub fn user(&self) -> &FirebaseUser {
        &self.user
    }

    pub fn email(&self) -> &str {
        &self.user.email
    }
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for AuthenticatedUser {
    type Error = AuthError;

    async fn from_request(req: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let auth_config = match req.guard::<&State<AuthConfig>>().await {
            Outcome::Success(config) => config,
            Outcome::Error((status, _)) => {
                return Outcome::Error((status, AuthError::ConfigUnavailable))
            }
            Outcome::Forward(f) => return Outcome::Forward(f),
        };

        let token = match req.headers().get_one("Authorization") {
            Some(header) if header.starts_with("Bearer ") => &header[7..],
            Some(_) => {
                warn!("Invalid Authorization header format");
                return Outcome::Error((Status::Unauthorized, AuthError::InvalidToken));
            }
            None => {
                return Outcome::Error((Status::Unauthorized, AuthError::MissingToken));
            }
        };

        let user = match verify_firebase_token(token, auth_config) {
            Ok(user) => user,
            Err(e) => {
                error!("Token verification failed: {}", e);
                return Outcome::Error((Status::Unauthorized, AuthError::TokenVerificationFailed));
            }
        };

        info!("User {} authenticated", user.email);
        Outcome::Success(AuthenticatedUser { user })
    }
}

#[derive(Debug)]
pub enum AuthError {
    MissingToken,
    InvalidToken,
    TokenVerificationFailed,
    ConfigUnavailable,
}

impl AuthError {
    pub fn message(&self) -> &'static str {
        match self {
            AuthError::MissingToken => "Authorization token required",
            AuthError::InvalidToken => "Invalid authorization token format",
            AuthError::TokenVerificationFailed => "Token verification failed",
            AuthError::ConfigUnavailable => "Authentication is not configured",
        }
    }
}

fn verify_firebase_token(token: &str, auth_config: &AuthConfig) -> Result<FirebaseUser> {
    let header = jsonwebtoken::decode_header(token)?;
    let kid = header
        .kid
        .ok_or_else(|| anyhow::anyhow!("Missing kid in token header"))?;

    let public_key = auth_config
        .firebase_keys
        .get(&kid)
        .ok_or_else(|| anyhow::anyhow!("Unknown key ID: {}", kid))?;

    let mut validation = Validation::new(Algorithm::RS256);
    validation.set_audience(&[&auth_config.project_id]);
    validation.set_issuer(&[format!(
        "https://securetoken.google.com/{}",
        auth_config.project_id
    )]);

    let decoding_key = DecodingKey::from_rsa_pem(public_key.as_bytes())?;
    let token_data = decode::<Claims>(token, &decoding_key, &validation)?;

    Ok(token_data.claims.into())
}

/// Optional auth guard that doesn't fail if no auth is provided.
/// Anonymous callers get a null usage view instead of a 401.
pub struct OptionalAuth {
    pub user: Option<AuthenticatedUser>,
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for OptionalAuth {
    type Error = ();

    async fn from_request(req: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        match AuthenticatedUser::from_request(req).await {
            Outcome::Success(auth) => Outcome::Success(OptionalAuth { user: Some(auth) }),
            _ => Outcome::Success(OptionalAuth { user: None }),
        }
    }
}

/// Request metadata captured for analytics events
pub struct ClientMeta {
    pub user_agent: Option<String>,
    pub client_ip: Option<String>,
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for ClientMeta {
    type Error = ();

    async fn from_request(req: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let user_agent = req.headers().get_one("User-Agent").map(|s| s.to_string());
        let client_ip = req.client_ip().map(|ip| ip.to_string());

        Outcome::Success(ClientMeta {
            user_agent,
            client_ip,
        })
    }
}
