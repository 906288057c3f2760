use crate::services::session::SessionManager;
use crate::utils::validation::{self, Field};
use serde::Deserialize;

/// Which provider operation a credentials submission runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthAction {
    SignIn,
    SignUp,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Touched {
    pub email: bool,
    pub password: bool,
}

impl Touched {
    pub fn all() -> Self {
        Self {
            email: true,
            password: true,
        }
    }

    pub fn get(&self, field: Field) -> bool {
        match field {
            Field::Email => self.email,
            Field::Password => self.password,
        }
    }
}

/// Posted body of the authentication form. Credentials live here only for
/// the duration of one request.
#[derive(Debug, Default, Deserialize)]
pub struct CredentialsForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// State of one authentication form: inputs, touched flags and the
/// summary error shown under the fields.
#[derive(Debug, Clone, Default)]
pub struct AuthForm {
    pub email: String,
    pub password: String,
    pub touched: Touched,
    pub error: Option<String>,
}

impl From<CredentialsForm> for AuthForm {
    fn from(form: CredentialsForm) -> Self {
        Self {
            email: form.email,
            password: form.password,
            ..Self::default()
        }
    }
}

impl AuthForm {
    /// The field received and lost focus.
    pub fn blur(&mut self, field: Field) {
        match field {
            Field::Email => self.touched.email = true,
            Field::Password => self.touched.password = true,
        }
    }

    /// Inline error for `field`, shown only once the field is touched.
    pub fn field_error(&self, field: Field) -> Option<&'static str> {
        if !self.touched.get(field) {
            return None;
        }
        validation::field_error(field, &self.email, &self.password)
    }

    /// Submit the credentials. Both fields become touched; invalid input
    /// sets the joined validator messages without contacting the provider,
    /// a provider failure sets its message verbatim, and success clears the
    /// error. Returns whether the call succeeded.
    pub async fn submit(&mut self, session: &SessionManager, action: AuthAction) -> bool {
        self.touched = Touched::all();
        self.error = None;

        let result = match action {
            AuthAction::SignIn => session.sign_in(&self.email, &self.password).await,
            AuthAction::SignUp => session
                .sign_up(&self.email, &self.password)
                .await
                .map(|_| ()),
        };

        match result {
            Ok(()) => true,
            Err(e) => {
                self.error = Some(e.to_string());
                false
            }
        }
    }
}
