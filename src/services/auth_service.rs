use crate::database::{MongoDB, USERS};
use crate::models::{AuthResponse, LoginRequest, SignupRequest, User, UserInfo};
use crate::utils::AppError;
use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use mongodb::bson::{doc, DateTime as BsonDateTime};
use serde::{Deserialize, Serialize};

// JWT Claims. Identity is the email; exp is set so stolen tokens age out.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub email: String,
    pub iat: usize,
    pub exp: usize,
}

const TOKEN_TTL_HOURS: i64 = 24;

fn get_jwt_secret() -> String {
    std::env::var("JWT_SECRET").unwrap_or_else(|_| "default-secret-change-me".to_string())
}

// Generate JWT token (HS256, symmetric secret)
pub fn generate_token(email: &str) -> Result<String, AppError> {
    let iat = Utc::now().timestamp() as usize;
    let exp = (Utc::now() + Duration::hours(TOKEN_TTL_HOURS)).timestamp() as usize;

    let claims = Claims {
        email: email.to_string(),
        iat,
        exp,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(get_jwt_secret().as_ref()),
    )
    .map_err(|e| AppError::DatabaseError(format!("Failed to generate token: {}", e)))
}

// Verify JWT token. Malformed, wrong scheme, bad signature and expired all
// collapse into Unauthorized; callers map it to 401.
pub fn verify_token(token: &str) -> Result<Claims, AppError> {
    let validation = Validation::new(Algorithm::HS256);

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(get_jwt_secret().as_ref()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| AppError::Unauthorized(format!("Invalid token: {}", e)))
}

// User signup
pub async fn signup(db: &MongoDB, request: &SignupRequest) -> Result<AuthResponse, AppError> {
    let collection = db.collection::<User>(USERS);

    // Check if user already exists
    let existing = collection
        .find_one(doc! { "email": &request.email })
        .await?;

    if existing.is_some() {
        return Err(AppError::InvalidRequest("Email already registered".to_string()));
    }

    let hashed_password = hash(&request.password, DEFAULT_COST)
        .map_err(|e| AppError::DatabaseError(format!("Failed to hash password: {}", e)))?;

    let new_user = User {
        id: None,
        email: request.email.clone(),
        password: hashed_password,
        full_name: request.full_name.clone(),
        created_at: Some(BsonDateTime::now()),
    };

    // The unique index on users(email) backstops the check above; a
    // concurrent signup for the same email loses here, not with a 500.
    match collection.insert_one(&new_user).await {
        Ok(_) => {}
        Err(e) if is_duplicate_key(&e) => {
            return Err(AppError::InvalidRequest("Email already registered".to_string()))
        }
        Err(e) => return Err(e.into()),
    }

    let token = generate_token(&new_user.email)?;

    log::info!("✅ User registered successfully: {}", new_user.email);

    Ok(AuthResponse {
        token,
        user: UserInfo {
            email: new_user.email,
            full_name: new_user.full_name,
        },
    })
}

// User login. Unknown email and wrong password return the same error so the
// response never reveals which one failed.
pub async fn login(db: &MongoDB, request: &LoginRequest) -> Result<AuthResponse, AppError> {
    let collection = db.collection::<User>(USERS);

    let user = collection
        .find_one(doc! { "email": &request.email })
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid credentials".to_string()))?;

    let valid = verify(&request.password, &user.password)
        .map_err(|e| AppError::DatabaseError(format!("Password verification error: {}", e)))?;

    if !valid {
        return Err(AppError::Unauthorized("Invalid credentials".to_string()));
    }

    let token = generate_token(&user.email)?;

    Ok(AuthResponse {
        token,
        user: UserInfo {
            email: user.email,
            full_name: user.full_name,
        },
    })
}

// Duplicate-key violation of the unique users(email) index
fn is_duplicate_key(e: &mongodb::error::Error) -> bool {
    match *e.kind {
        mongodb::error::ErrorKind::Write(mongodb::error::WriteFailure::WriteError(ref we)) => {
            we.code == 11000
        }
        _ => false,
    }
}

// Resolve the token's email to the stored user. Looked up on every
// authenticated request; there is no session cache.
pub async fn get_user_by_email(db: &MongoDB, email: &str) -> Result<User, AppError> {
    let collection = db.collection::<User>(USERS);

    collection
        .find_one(doc! { "email": email })
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_round_trip() {
        let token = generate_token("teacher@example.com").unwrap();
        let claims = verify_token(&token).unwrap();
        assert_eq!(claims.email, "teacher@example.com");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_garbage_token_rejected() {
        let result = verify_token("not-a-jwt");
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }

    #[test]
    fn test_tampered_token_rejected() {
        let token = generate_token("teacher@example.com").unwrap();
        let mut parts: Vec<String> = token.split('.').map(String::from).collect();
        // Flip the signature segment
        parts[2] = parts[2].chars().rev().collect();
        let tampered = parts.join(".");
        assert!(verify_token(&tampered).is_err());
    }

    #[test]
    fn test_bcrypt_hash_is_salted() {
        let a = hash("hunter2", DEFAULT_COST).unwrap();
        let b = hash("hunter2", DEFAULT_COST).unwrap();
        assert_ne!(a, b);
        assert!(verify("hunter2", &a).unwrap());
        assert!(verify("hunter2", &b).unwrap());
        assert!(!verify("hunter3", &a).unwrap());
    }

    use mongodb::bson::oid::ObjectId;

    async fn test_db() -> MongoDB {
        dotenv::dotenv().ok();
        let uri = std::env::var("MONGODB_URI")
            .unwrap_or_else(|_| "mongodb://localhost:27017/classroom_test".to_string());
        MongoDB::new(&uri).await.unwrap()
    }

    fn fresh_email() -> String {
        format!("teacher-{}@example.com", ObjectId::new().to_hex())
    }

    #[tokio::test]
    #[ignore] // Requires MongoDB to be running
    async fn test_signup_returns_decodable_token_and_rejects_duplicate() {
        let db = test_db().await;

        let email = fresh_email();
        let request = SignupRequest {
            email: email.clone(),
            password: "a_secure_password".into(),
            full_name: Some("Test Teacher".into()),
        };

        let response = signup(&db, &request).await.unwrap();
        let claims = verify_token(&response.token).unwrap();
        assert_eq!(claims.email, email);
        assert_eq!(response.user.email, email);
        assert_eq!(response.user.full_name.as_deref(), Some("Test Teacher"));

        // Same email again maps to the 400 taxonomy, not a 500
        let duplicate = signup(&db, &request).await;
        assert!(matches!(duplicate, Err(AppError::InvalidRequest(_))));
    }

    #[tokio::test]
    #[ignore] // Requires MongoDB to be running
    async fn test_duplicate_insert_hits_unique_index() {
        let db = test_db().await;
        let collection = db.collection::<User>(USERS);

        let user = User {
            id: None,
            email: fresh_email(),
            password: hash("pw", DEFAULT_COST).unwrap(),
            full_name: None,
            created_at: Some(BsonDateTime::now()),
        };

        // Bypasses the find-one pre-check, as a racing signup would
        collection.insert_one(&user).await.unwrap();
        let second = User { id: None, ..user };
        let err = collection.insert_one(&second).await.unwrap_err();
        assert!(is_duplicate_key(&err));
    }

    #[tokio::test]
    #[ignore] // Requires MongoDB to be running
    async fn test_login_failures_are_indistinguishable() {
        let db = test_db().await;

        let email = fresh_email();
        signup(
            &db,
            &SignupRequest {
                email: email.clone(),
                password: "correct-horse".into(),
                full_name: None,
            },
        )
        .await
        .unwrap();

        let ok = login(
            &db,
            &LoginRequest {
                email: email.clone(),
                password: "correct-horse".into(),
            },
        )
        .await
        .unwrap();
        assert_eq!(verify_token(&ok.token).unwrap().email, email);

        let wrong_password = login(
            &db,
            &LoginRequest {
                email,
                password: "battery-staple".into(),
            },
        )
        .await;
        let unknown_email = login(
            &db,
            &LoginRequest {
                email: fresh_email(),
                password: "correct-horse".into(),
            },
        )
        .await;

        // Same message for wrong password and unknown email
        match (wrong_password, unknown_email) {
            (Err(AppError::Unauthorized(a)), Err(AppError::Unauthorized(b))) => assert_eq!(a, b),
            other => panic!("expected Unauthorized pair, got {:?}", other),
        }
    }
}
