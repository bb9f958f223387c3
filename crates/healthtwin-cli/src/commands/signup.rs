use clap::Subcommand;
use healthtwin_core::view::signup::validate_email;

#[derive(Subcommand)]
pub enum SignupAction {
    /// Validate an email address the way the form does
    Check {
        /// Address as typed; surrounding whitespace is ignored
        email: String,
    },
}

pub fn run(action: SignupAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        SignupAction::Check { email } => {
            let email = validate_email(&email)?;
            println!("ok: {email}");
        }
    }
    Ok(())
}
