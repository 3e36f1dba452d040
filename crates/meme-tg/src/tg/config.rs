use crate::config::invalid_value;
use crate::Result;
use serde::Deserialize;

/// Value of the token in the config templates. It means the token wasn't set.
const PLACEHOLDER_TOKEN: &str = "YOUR_BOT_TOKEN";

#[derive(Deserialize, Clone)]
pub(crate) struct Config {
    /// Token issued by @BotFather
    pub(crate) token: String,
}

impl Config {
    pub(crate) fn validate(&self) -> Result {
        let token = self.token.trim();

        if token.is_empty() {
            return Err(invalid_value("TG_TOKEN", "the bot token must not be empty"));
        }

        // The token is sent to Telegram as is
        if token != self.token {
            return Err(invalid_value(
                "TG_TOKEN",
                "the bot token must not have leading or trailing whitespace",
            ));
        }

        if token == PLACEHOLDER_TOKEN {
            return Err(invalid_value(
                "TG_TOKEN",
                "the bot token is a placeholder, replace it with the real one",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::from_iter;
    use expect_test::expect;

    fn load(vars: &[(&str, &str)]) -> Result<Config> {
        let vars = vars.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned()));
        let config: Config = from_iter("TG_", vars)?;
        config.validate()?;
        Ok(config)
    }

    #[test]
    fn missing_token() {
        let err = load(&[]).err().unwrap();
        assert!(err.to_string().contains("prefix 'TG_'"), "{err}");
        assert!(err.to_string().contains("token"), "{err}");
    }

    #[test]
    fn empty_and_placeholder_tokens_are_rejected() {
        let message = |token| {
            let err = load(&[("TG_TOKEN", token)]).err().unwrap();
            err.to_string().split_once("): ").unwrap().1.to_owned()
        };

        expect!["Invalid value of the TG_TOKEN environment variable: the bot token must not be empty"]
            .assert_eq(&message(" "));
        expect!["Invalid value of the TG_TOKEN environment variable: the bot token is a placeholder, replace it with the real one"]
            .assert_eq(&message("YOUR_BOT_TOKEN"));
    }

    #[test]
    fn token_with_surrounding_whitespace_is_rejected() {
        for token in [" 123456:ABC-DEF", "123456:ABC-DEF ", "\t123456:ABC-DEF\n"] {
            let err = load(&[("TG_TOKEN", token)]).err().unwrap();
            assert!(
                err.to_string().ends_with("must not have leading or trailing whitespace"),
                "{err}"
            );
        }
    }

    #[test]
    fn real_token_is_accepted() {
        let config = load(&[("TG_TOKEN", "123456:ABC-DEF")]).unwrap();
        assert_eq!(config.token, "123456:ABC-DEF");
    }
}
