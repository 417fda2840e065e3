use crate::infrastructure::config::{CommandConfig, GuildSecurity, SecurityMap};
use super::Message;

/// Frozen descriptor of a command, built from its config entry
#[derive(Debug, Clone)]
pub struct CommandDescriptor {
    config: CommandConfig,
}

impl CommandDescriptor {
    pub fn new(config: CommandConfig) -> Self {
        Self { config }
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn description(&self) -> &str {
        &self.config.description
    }

    pub fn version(&self) -> &str {
        &self.config.version
    }

    pub fn help(&self) -> &str {
        &self.config.help
    }

    pub fn path(&self) -> &str {
        &self.config.path
    }

    pub fn security(&self) -> Option<&SecurityMap> {
        self.config.security.as_ref()
    }

    /// Command-specific sub-config
    pub fn config(&self) -> &serde_json::Value {
        &self.config.config
    }

    /// Decide whether the author of `message` may run this command.
    ///
    /// Admins always pass. Without a security descriptor nobody else does; an
    /// empty descriptor lets everyone through. Otherwise the message's guild
    /// must have a rule, and the member must satisfy it by holding any listed
    /// role or the listed permissions.
    pub fn is_permitted(&self, message: &Message, admins: &[String]) -> bool {
        if admins.iter().any(|id| *id == message.author.id) {
            return true;
        }

        let Some(security) = self.security() else {
            return false;
        };
        if security.is_empty() {
            return true;
        }

        let Some(guild) = &message.guild else {
            return false;
        };
        match security.get(&guild.id) {
            Some(rule) => rule.is_open() || member_satisfies(rule, message),
            None => false,
        }
    }
}

fn member_satisfies(rule: &GuildSecurity, message: &Message) -> bool {
    let (Some(guild), Some(member)) = (&message.guild, &message.member) else {
        return false;
    };

    let has_role = rule.roles.iter().flatten().any(|name| {
        guild
            .role_by_name(name)
            .is_some_and(|role| role.has_member(&member.user_id))
    });

    let has_permissions = rule
        .permissions
        .is_some_and(|required| !required.is_empty() && member.permissions.grants(required));

    has_role || has_permissions
}

impl From<CommandConfig> for CommandDescriptor {
    fn from(config: CommandConfig) -> Self {
        Self::new(config)
    }
}
