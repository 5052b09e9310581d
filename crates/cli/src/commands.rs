//! CLI commands

use anyhow::{Result, bail};
use clap::Subcommand;
use serde::Serialize;
use tracing::info;
use waypoint_frontend_common::{AppContext, Navigation, Route};
use waypoint_http::{CreateUserRequest, UpdateUserRequest};

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in and remember the session
    Login {
        #[arg(long)]
        email: String,

        #[arg(long, env = "WAYPOINT_PASSWORD", hide_env_values = true)]
        password: String,

        /// Login route the sign-in started from, e.g. `/login?redirect=/users`
        #[arg(long, default_value = "/login")]
        from: String,
    },

    /// Sign out and forget the stored token
    Logout,

    /// Show the signed-in user
    Whoami,

    /// Manage users
    Users {
        #[command(subcommand)]
        command: UserCommands,
    },

    /// Check whether a route may be opened with the current session
    Open {
        /// Full path, e.g. `/dashboard?tab=2`
        path: String,
    },
}

#[derive(Subcommand)]
pub enum UserCommands {
    /// List all users
    List,

    /// Show one user
    Get { id: i64 },

    /// Create a user
    Create {
        #[arg(long)]
        email: String,

        #[arg(long, env = "WAYPOINT_NEW_PASSWORD", hide_env_values = true)]
        password: String,

        #[arg(long)]
        name: Option<String>,
    },

    /// Update a user; only the given fields change
    Update {
        id: i64,

        #[arg(long)]
        email: Option<String>,

        #[arg(long)]
        password: Option<String>,

        #[arg(long)]
        name: Option<String>,
    },

    /// Delete a user
    Delete { id: i64 },
}

impl Commands {
    /// Route this command renders, if it is guarded
    pub fn route(&self) -> Option<String> {
        match self {
            Self::Login { from, .. } => Some(from.clone()),
            Self::Logout | Self::Open { .. } => None,
            Self::Whoami => Some("/profile".to_string()),
            Self::Users { command } => Some(command.route()),
        }
    }

    pub async fn execute(self, ctx: &AppContext) -> Result<()> {
        if !matches!(self, Self::Login { .. }) {
            if let Some(route) = self.route() {
                if let Navigation::Redirect(to) = ctx.navigate(&route) {
                    bail!("Sign in required, redirected to {to}");
                }
            }
        }

        match self {
            Self::Login {
                email,
                password,
                from,
            } => {
                let next = sign_in(ctx, &email, &password, &from).await?;
                println!("Continue at {next}");
                Ok(())
            }
            Self::Logout => {
                ctx.session().logout();
                Ok(())
            }
            Self::Whoami => {
                let user = ctx.session().fetch_current_user().await?;
                print_json(&user)
            }
            Self::Users { command } => command.execute(ctx).await,
            Self::Open { path } => {
                match ctx.navigate(&path) {
                    Navigation::Allow => println!("{path}"),
                    Navigation::Redirect(to) => println!("{to}"),
                }
                Ok(())
            }
        }
    }
}

impl UserCommands {
    fn route(&self) -> String {
        match self {
            Self::List => "/users".to_string(),
            Self::Get { id } | Self::Delete { id } => format!("/users/{id}"),
            Self::Create { .. } => "/users/new".to_string(),
            Self::Update { id, .. } => format!("/users/{id}/edit"),
        }
    }

    pub async fn execute(self, ctx: &AppContext) -> Result<()> {
        let client = ctx.client();
        match self {
            Self::List => print_json(&client.get_users().await?),
            Self::Get { id } => print_json(&client.get_user(id).await?),
            Self::Create {
                email,
                password,
                name,
            } => {
                let request = CreateUserRequest {
                    email,
                    password,
                    name,
                };
                print_json(&client.create_user(&request).await?)
            }
            Self::Update {
                id,
                email,
                password,
                name,
            } => {
                let changes = UpdateUserRequest {
                    email,
                    password,
                    name,
                };
                print_json(&client.update_user(id, &changes).await?)
            }
            Self::Delete { id } => {
                client.delete_user(id).await?;
                info!(user_id = id, "User deleted");
                Ok(())
            }
        }
    }
}

/// Sign in starting from `from` and return the route to continue at.
///
/// A protected `from` is recorded on the login route first, so signing in
/// leads back to it.
async fn sign_in(ctx: &AppContext, email: &str, password: &str, from: &str) -> Result<String> {
    let decision = ctx.navigate(from);

    if ctx.session().is_authenticated() {
        let next = match decision {
            Navigation::Redirect(to) => to,
            Navigation::Allow => from.to_string(),
        };
        println!("Already signed in");
        return Ok(next);
    }

    let login_route = match decision {
        Navigation::Redirect(to) => Route::parse(&to),
        Navigation::Allow => Route::parse(from),
    };

    let user = ctx.session().login(email, password).await?;
    print_json(&user)?;

    let next = ctx.guard().post_login_target(&login_route);
    info!(%next, "Continuing after login");
    Ok(next)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
