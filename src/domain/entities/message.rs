use super::{Permissions, User};

/// A guild role and the ids of the members holding it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Role {
    pub id: String,
    pub name: String,
    pub members: Vec<String>,
}

impl Role {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            members: Vec::new(),
        }
    }

    pub fn with_member(mut self, user_id: impl Into<String>) -> Self {
        self.members.push(user_id.into());
        self
    }

    pub fn has_member(&self, user_id: &str) -> bool {
        self.members.iter().any(|m| m == user_id)
    }
}

/// The guild (server) a message was posted in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Guild {
    pub id: String,
    pub name: String,
    pub roles: Vec<Role>,
}

impl Guild {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            roles: Vec::new(),
        }
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.roles.push(role);
        self
    }

    pub fn role_by_name(&self, name: &str) -> Option<&Role> {
        self.roles.iter().find(|r| r.name == name)
    }
}

/// The author's membership in the message's guild
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub user_id: String,
    pub permissions: Permissions,
}

impl Member {
    pub fn new(user_id: impl Into<String>, permissions: Permissions) -> Self {
        Self {
            user_id: user_id.into(),
            permissions,
        }
    }
}

/// An inbound chat message, as delivered by the platform client
#[derive(Debug, Clone)]
pub struct Message {
    pub id: String,
    pub channel_id: String,
    pub author: User,
    pub content: String,
    pub guild: Option<Guild>,
    pub member: Option<Member>,
}

impl Message {
    pub fn new(channel_id: impl Into<String>, author: User, content: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            channel_id: channel_id.into(),
            author,
            content: content.into(),
            guild: None,
            member: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Attach guild context; the author becomes a member with `permissions`.
    pub fn in_guild(mut self, guild: Guild, permissions: Permissions) -> Self {
        self.member = Some(Member::new(self.author.id.clone(), permissions));
        self.guild = Some(guild);
        self
    }

    pub fn is_guild_message(&self) -> bool {
        self.guild.is_some()
    }
}
