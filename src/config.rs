use validator::Validate;

use crate::teams::DEFAULT_TEAM_COUNT;

#[derive(Deserialize, Debug, Validate)]
pub struct Config {
    api_host: Option<String>,
    api_port: Option<usize>,
    #[validate(length(min = 32))]
    session_private_key: String,
    /// only send the identity cookie over https
    #[serde(default)]
    secure_cookies: bool,
    /// the shared secret that grants access to the admin console
    #[validate(length(min = 1))]
    admin_password: String,
    /// directory holding participants.csv and ratings.csv
    data_dir: Option<String>,
    /// how many teams are balanced when the admin doesn't ask for a count
    #[serde(default = "default_team_count")]
    #[validate(range(min = 1, max = 64))]
    team_count: usize,
}

fn default_team_count() -> usize {
    DEFAULT_TEAM_COUNT
}

lazy_static! {
    static ref CONFIG: Config = match envy::from_env::<Config>() {
        Ok(config) => {
            match config.validate() {
                Ok(()) => config,
                Err(e) => panic!("invalid environment variable: {}", e),
            }
        }
        Err(error) => panic!("Missing or incorrect environment variable: {}", error),
    };
}

impl Config {
    pub fn api_host() -> &'static str {
        match &CONFIG.api_host {
            Some(host) => host.as_ref(),
            None => "localhost",
        }
    }

    pub fn api_port() -> usize {
        CONFIG.api_port.unwrap_or(8080)
    }

    pub fn session_private_key() -> &'static str {
        CONFIG.session_private_key.as_ref()
    }

    pub fn secure_cookies() -> bool {
        CONFIG.secure_cookies
    }

    pub fn admin_password() -> &'static str {
        CONFIG.admin_password.as_ref()
    }

    pub fn data_dir() -> &'static str {
        match &CONFIG.data_dir {
            Some(dir) => dir.as_ref(),
            None => ".",
        }
    }

    pub fn team_count() -> usize {
        CONFIG.team_count
    }
}
