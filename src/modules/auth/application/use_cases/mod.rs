pub mod login_with_qr_token;
