use crate::core::{ClassUpdate, MemberUpdate};
use clap::{Args, Parser, Subcommand};

#[derive(Debug, Clone, Parser)]
#[command(name = "gym-records")]
#[command(about = "Record management for gym members, classes and enrollments")]
pub struct CliConfig {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Override the data directory from the configuration
    #[arg(long)]
    pub data_dir: Option<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Manage members
    Member {
        #[command(subcommand)]
        action: MemberCommand,
    },
    /// Manage classes
    Class {
        #[command(subcommand)]
        action: ClassCommand,
    },
    /// Enroll a member in a class
    Enroll { member_id: String, class_id: String },
    /// Remove a member from a class
    Unenroll { member_id: String, class_id: String },
    /// List the members enrolled in a class
    Roster { class_id: String },
    /// List the classes a member is enrolled in
    Schedule { member_id: String },
    /// Show the remaining seats of every class
    Capacity,
    /// Print the effective configuration
    Config,
}

#[derive(Debug, Clone, Subcommand)]
pub enum MemberCommand {
    /// Register a new member
    Add {
        name: String,
        #[arg(long, default_value = "Mensual")]
        subscription: String,
    },
    List,
    Show { id: String },
    Update(MemberUpdateArgs),
    /// Delete a member and their enrollments
    Delete { id: String },
}

#[derive(Debug, Clone, Args)]
pub struct MemberUpdateArgs {
    pub id: String,
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub subscription: Option<String>,
    /// Raw field assignment, e.g. --set name="Ana Maria"; unknown fields are ignored
    #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub fields: Vec<(String, String)>,
}

impl MemberUpdateArgs {
    pub fn to_update(&self) -> MemberUpdate {
        let mut update = MemberUpdate::from_fields(self.fields.iter().cloned());
        if let Some(name) = &self.name {
            update.name = Some(name.clone());
        }
        if let Some(subscription) = &self.subscription {
            update.subscription_type = Some(subscription.clone());
        }
        update
    }
}

#[derive(Debug, Clone, Subcommand)]
pub enum ClassCommand {
    /// Register a new class
    Add {
        name: String,
        instructor: String,
        #[arg(long, default_value_t = 10, allow_negative_numbers = true)]
        capacity: i64,
    },
    List,
    Show { id: String },
    Update(ClassUpdateArgs),
    /// Delete a class and its enrollments
    Delete { id: String },
}

#[derive(Debug, Clone, Args)]
pub struct ClassUpdateArgs {
    pub id: String,
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub instructor: Option<String>,
    #[arg(long, allow_negative_numbers = true)]
    pub capacity: Option<i64>,
}

impl ClassUpdateArgs {
    pub fn to_update(&self) -> ClassUpdate {
        ClassUpdate {
            name: self.name.clone(),
            instructor: self.instructor.clone(),
            capacity: self.capacity,
        }
    }
}

fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(key, value)| (key.trim().to_string(), value.to_string()))
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_member_update() {
        let cli = CliConfig::try_parse_from([
            "gym-records",
            "member",
            "update",
            "3",
            "--subscription",
            "Anual",
            "--set",
            "name=Ana Maria",
            "--set",
            "membership=Anual",
        ])
        .unwrap();

        let Command::Member {
            action: MemberCommand::Update(args),
        } = cli.command
        else {
            panic!("expected member update");
        };
        let update = args.to_update();
        assert_eq!(args.id, "3");
        assert_eq!(update.name.as_deref(), Some("Ana Maria"));
        assert_eq!(update.subscription_type.as_deref(), Some("Anual"));
    }

    #[test]
    fn test_parse_class_add_defaults() {
        let cli = CliConfig::try_parse_from(["gym-records", "class", "add", "Yoga", "Ana"]).unwrap();

        assert!(matches!(
            cli.command,
            Command::Class {
                action: ClassCommand::Add { capacity: 10, .. }
            }
        ));
    }

    #[test]
    fn test_global_flags() {
        let cli = CliConfig::try_parse_from([
            "gym-records",
            "--data-dir",
            "info",
            "-v",
            "capacity",
        ])
        .unwrap();

        assert_eq!(cli.data_dir.as_deref(), Some("info"));
        assert!(cli.verbose);
        assert!(matches!(cli.command, Command::Capacity));
    }

    #[test]
    fn test_bad_key_value() {
        assert!(parse_key_value("name").is_err());
        assert_eq!(
            parse_key_value("name=a=b").unwrap(),
            ("name".to_string(), "a=b".to_string())
        );
    }
}
