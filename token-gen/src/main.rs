use clap::Parser;
use jsonwebtoken::{EncodingKey, Header};
use serde::Serialize;

/// Mint an HS256 access token accepted by the gateway (development only).
///
/// Claims: sub, role, iat, exp and optionally iss. The secret must match the
/// gateway's `JWT_SECRET`.
#[derive(Parser, Debug)]
#[command(name = "token-gen", version, about)]
struct Args {
    /// User identifier placed in `sub`
    #[arg(long)]
    sub: String,

    /// Role claim: head_office / agency / logistic (anything else maps to guest)
    #[arg(long)]
    role: String,

    /// HS256 shared secret
    #[arg(long, env = "JWT_SECRET", hide_env_values = true)]
    secret: String,

    /// Optional issuer (`iss`), required when the gateway sets JWT_ISSUER
    #[arg(long, env = "JWT_ISSUER")]
    issuer: Option<String>,

    /// Lifetime in seconds. Negative values produce an already-expired token.
    #[arg(long, default_value_t = 3600, allow_negative_numbers = true)]
    ttl_seconds: i64,

    /// Print only the token (no extra lines)
    #[arg(long, default_value_t = false)]
    quiet: bool,
}

#[derive(Debug, Serialize)]
struct Claims<'a> {
    sub: &'a str,
    role: &'a str,
    iat: i64,
    exp: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    iss: Option<&'a str>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    if args.secret.trim().is_empty() {
        return Err("secret must not be empty".into());
    }

    let iat = chrono::Utc::now().timestamp();
    let exp = iat + args.ttl_seconds;

    let claims = Claims {
        sub: &args.sub,
        role: &args.role,
        iat,
        exp,
        iss: args.issuer.as_deref(),
    };

    let token = jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(args.secret.as_bytes()),
    )?;

    if args.quiet {
        println!("{}", token);
        return Ok(());
    }

    println!("token: {}", token);
    println!("sub: {}", args.sub);
    println!("role: {}", args.role);
    println!("exp: {}", exp);
    println!("Authorization: Bearer {}", token);

    Ok(())
}
