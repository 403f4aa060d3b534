use anyhow::Context;
use clap::Parser;
use gym_records::config::cli::{ClassCommand, Command, MemberCommand};
use gym_records::config::LogFormat;
use gym_records::core::{CapacityRow, Class, ConfigProvider, Member};
use gym_records::utils::{logger, validation::Validate};
use gym_records::{
    ClassRegistry, CliConfig, EnrollmentManager, GymConfig, GymError, LocalStorage,
    MemberRegistry,
};

fn main() {
    let cli = CliConfig::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {:#}", e);
            std::process::exit(2);
        }
    };

    let level = config.logging.level.as_deref();
    if cli.json_logs || config.logging.format == LogFormat::Json {
        logger::init_json_logger(cli.verbose, level);
    } else {
        logger::init_cli_logger(cli.verbose, level);
    }
    tracing::debug!("Effective config: {:?}", config);

    match run(cli.command, config) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            tracing::error!("Command failed: {}", e);
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            let exit_code = if e.is_validation() { 1 } else { 3 };
            std::process::exit(exit_code);
        }
    }
}

fn load_config(cli: &CliConfig) -> anyhow::Result<GymConfig> {
    let config = match &cli.config {
        Some(path) => GymConfig::from_file(path)
            .with_context(|| format!("Failed to load config file '{}'", path))?,
        None => GymConfig::default(),
    };
    let config = config.with_data_dir(cli.data_dir.clone());
    config.validate().context("Configuration validation failed")?;
    Ok(config)
}

/// Returns `Ok(false)` when the command completed but reported a miss.
fn run(command: Command, config: GymConfig) -> Result<bool, GymError> {
    let storage = LocalStorage::new(config.data_dir());
    let members = MemberRegistry::new(storage.clone(), config.clone());
    let classes = ClassRegistry::new(storage.clone(), config.clone());
    let enrollments = EnrollmentManager::new(storage, config.clone());

    match command {
        Command::Member { action } => match action {
            MemberCommand::Add { name, subscription } => {
                let member = members.create(&name, &subscription)?;
                println!("✅ Member registered with ID {}", member.id);
            }
            MemberCommand::List => print_members(&members.read_all(), "No members registered."),
            MemberCommand::Show { id } => match members.find_by_id(&id) {
                Some(member) => print_members(&[member], ""),
                None => return Ok(not_found("member", &id)),
            },
            MemberCommand::Update(args) => match members.update(&args.id, args.to_update())? {
                Some(member) => println!("✅ Member {} updated", member.id),
                None => return Ok(not_found("member", &args.id)),
            },
            MemberCommand::Delete { id } => {
                if !members.delete(&id)? {
                    return Ok(not_found("member", &id));
                }
                println!("✅ Member {} deleted", id);
            }
        },
        Command::Class { action } => match action {
            ClassCommand::Add {
                name,
                instructor,
                capacity,
            } => {
                let class = classes.create(&name, &instructor, capacity)?;
                println!("✅ Class registered with ID {}", class.id);
            }
            ClassCommand::List => print_classes(&classes.read_all(), "No classes registered."),
            ClassCommand::Show { id } => match classes.find_by_id(&id) {
                Some(class) => print_classes(&[class], ""),
                None => return Ok(not_found("class", &id)),
            },
            ClassCommand::Update(args) => match classes.update(&args.id, args.to_update())? {
                Some(class) => println!("✅ Class {} updated", class.id),
                None => return Ok(not_found("class", &args.id)),
            },
            ClassCommand::Delete { id } => {
                if !classes.delete(&id)? {
                    return Ok(not_found("class", &id));
                }
                println!("✅ Class {} deleted", id);
            }
        },
        Command::Enroll {
            member_id,
            class_id,
        } => {
            let outcome = enrollments.enroll(&member_id, &class_id)?;
            if !outcome.is_success() {
                eprintln!("❌ {}", outcome);
                return Ok(false);
            }
            println!("✅ {}", outcome);
        }
        Command::Unenroll {
            member_id,
            class_id,
        } => {
            if !enrollments.unenroll(&member_id, &class_id)? {
                eprintln!(
                    "❌ Member {} is not enrolled in class {}",
                    member_id, class_id
                );
                return Ok(false);
            }
            println!("✅ Member {} removed from class {}", member_id, class_id);
        }
        Command::Roster { class_id } => print_members(
            &enrollments.members_of_class(&class_id),
            &format!("No members enrolled in class '{}'.", class_id),
        ),
        Command::Schedule { member_id } => print_classes(
            &enrollments.classes_of_member(&member_id),
            &format!("Member '{}' is not enrolled in any class.", member_id),
        ),
        Command::Capacity => print_capacity(&enrollments.capacity_report()),
        Command::Config => print!("{}", config.to_toml_string()?),
    }

    Ok(true)
}

fn not_found(kind: &str, id: &str) -> bool {
    eprintln!("❌ No {} found with ID '{}'", kind, id);
    false
}

fn print_members(members: &[Member], empty_message: &str) {
    if members.is_empty() {
        println!("{}", empty_message);
        return;
    }
    println!("{:<6} {:<32} {}", "ID", "Name", "Subscription");
    for member in members {
        println!(
            "{:<6} {:<32} {}",
            member.id, member.name, member.subscription_type
        );
    }
}

fn print_classes(classes: &[Class], empty_message: &str) {
    if classes.is_empty() {
        println!("{}", empty_message);
        return;
    }
    println!("{:<6} {:<24} {:<24} {}", "ID", "Class", "Instructor", "Capacity");
    for class in classes {
        println!(
            "{:<6} {:<24} {:<24} {}",
            class.id, class.name, class.instructor, class.capacity
        );
    }
}

fn print_capacity(rows: &[CapacityRow]) {
    if rows.is_empty() {
        println!("No classes registered.");
        return;
    }
    println!(
        "{:<6} {:<24} {:>8} {:>9} {:>9}",
        "ID", "Class", "Capacity", "Enrolled", "Available"
    );
    for row in rows {
        println!(
            "{:<6} {:<24} {:>8} {:>9} {:>9}",
            row.class.id, row.class.name, row.class.capacity, row.enrolled, row.available
        );
    }
}
