use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex_lite::Regex;
use crate::application::errors::CommandError;
use crate::domain::entities::{CommandDescriptor, UserProfile};
use crate::domain::traits::{Command, CommandResult, Context};
use crate::infrastructure::config::CommandConfig;

static USER_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+$").expect("valid user id pattern"));

/// Looks up a user by id and posts their profile
pub struct FetchUserCommand {
    descriptor: CommandDescriptor,
}

impl FetchUserCommand {
    pub fn new(config: CommandConfig) -> Self {
        Self {
            descriptor: CommandDescriptor::new(config),
        }
    }

    pub fn create(config: &CommandConfig) -> Box<dyn Command> {
        Box::new(Self::new(config.clone()))
    }
}

fn render(profile: &UserProfile) -> String {
    let mut out = format!("**{}**\nID: {}\nCreated At: {}\nPresence: {}",
        profile.tag,
        profile.id,
        profile.created_at.to_rfc2822(),
        profile.presence,
    );
    if let Some(avatar) = &profile.avatar_url {
        out.push_str(&format!("\n{}", avatar));
    }
    out
}

#[async_trait]
impl Command for FetchUserCommand {
    fn descriptor(&self) -> &CommandDescriptor {
        &self.descriptor
    }

    async fn exec(&self, argv: &[String], ctx: &Context) -> CommandResult {
        let Some(user_id) = argv.get(1) else {
            let err = CommandError::InvalidArgs("Insufficient arguments.".to_string());
            return Err(ctx.reply_err(err).await);
        };

        if !USER_ID.is_match(user_id) {
            let err = CommandError::InvalidArgs(format!("{} is not a valid user ID.", user_id));
            return Err(ctx.reply_err(err).await);
        }

        let profile = match ctx.client().fetch_user(user_id).await {
            Ok(profile) => profile,
            Err(e) => return Err(ctx.reply_err(e.into()).await),
        };

        Ok(Some(ctx.reply(render(&profile)).await?))
    }
}
