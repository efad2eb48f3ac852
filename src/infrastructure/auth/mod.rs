mod userinfo_verifier;

pub use userinfo_verifier::UserInfoVerifier;
