use std::error::Error;

use clap::{Args, Parser, Subcommand};
use ledger::{Currency, FileStore, Group, Ledger, MoneyCents};
use uuid::Uuid;

mod settings;

#[derive(Parser, Debug)]
#[command(name = "romana")]
#[command(about = "Shared-expense ledger: track who paid what and settle up")]
struct Cli {
    /// Directory holding the ledger snapshot (also read from `ROMANA_STORE`).
    #[arg(long, env = "ROMANA_STORE")]
    store: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Group(GroupCmd),
    Member(MemberCmd),
    Expense(ExpenseCmd),
    /// Show each member's net balance (positive = is owed).
    Balances(GroupSelector),
    /// Show the settling transfer plan.
    Debts(GroupSelector),
    /// Clear the group's open expenses after everyone paid up in real life.
    Settle(GroupSelector),
}

#[derive(Args, Debug)]
struct GroupSelector {
    /// Group name or id.
    #[arg(long)]
    group: String,
}

#[derive(Args, Debug)]
struct GroupCmd {
    #[command(subcommand)]
    command: GroupCommand,
}

#[derive(Subcommand, Debug)]
enum GroupCommand {
    Create(GroupCreateArgs),
    List,
    Delete(GroupSelector),
}

#[derive(Args, Debug)]
struct GroupCreateArgs {
    #[arg(long)]
    name: String,
    /// Repeat for each member.
    #[arg(long = "member")]
    members: Vec<String>,
    #[arg(long, default_value = "EUR")]
    currency: String,
}

#[derive(Args, Debug)]
struct MemberCmd {
    #[command(subcommand)]
    command: MemberCommand,
}

#[derive(Subcommand, Debug)]
enum MemberCommand {
    Add(MemberArgs),
    Remove(MemberArgs),
}

#[derive(Args, Debug)]
struct MemberArgs {
    /// Group name or id.
    #[arg(long)]
    group: String,
    #[arg(long)]
    name: String,
}

#[derive(Args, Debug)]
struct ExpenseCmd {
    #[command(subcommand)]
    command: ExpenseCommand,
}

#[derive(Subcommand, Debug)]
enum ExpenseCommand {
    Add(ExpenseAddArgs),
    Delete(ExpenseDeleteArgs),
}

#[derive(Args, Debug)]
struct ExpenseAddArgs {
    /// Group name or id.
    #[arg(long)]
    group: String,
    #[arg(long)]
    description: String,
    /// Decimal amount, e.g. `12.50`.
    #[arg(long)]
    amount: String,
    /// Name of the member who paid.
    #[arg(long)]
    paid_by: String,
    /// Repeat for each participant sharing the cost; defaults to every
    /// member.
    #[arg(long = "split")]
    split: Vec<String>,
}

#[derive(Args, Debug)]
struct ExpenseDeleteArgs {
    /// Group name or id.
    #[arg(long)]
    group: String,
    #[arg(long)]
    id: Uuid,
}

fn resolve_group_id(
    ledger: &Ledger<FileStore>,
    name_or_id: &str,
) -> Result<String, Box<dyn Error + Send + Sync>> {
    if ledger.group(name_or_id).is_ok() {
        return Ok(name_or_id.to_string());
    }
    ledger
        .groups()
        .find(|group| group.name.eq_ignore_ascii_case(name_or_id))
        .map(|group| group.id.clone())
        .ok_or_else(|| format!("no group named {name_or_id}").into())
}

fn resolve_member(group: &Group, name: &str) -> Result<Uuid, Box<dyn Error + Send + Sync>> {
    group
        .member_by_name(name)
        .map(|member| member.id)
        .ok_or_else(|| format!("no member named {} in {}", name, group.name).into())
}

fn member_label(group: &Group, member_id: Uuid) -> String {
    group
        .member(member_id)
        .map(|member| member.name.clone())
        .unwrap_or_else(|| format!("former member {member_id}"))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let cli = Cli::parse();
    let settings = settings::Settings::new()?;

    let level = settings
        .app
        .as_ref()
        .map_or_else(|| String::from("info"), |app| app.level.clone());
    tracing_subscriber::fmt()
        .with_env_filter(format!("romana={level},ledger={level}"))
        .init();

    let store_path = cli
        .store
        .or(settings.storage.map(|storage| storage.path))
        .unwrap_or_else(|| String::from("./romana_data"));
    let user_name = settings
        .app
        .and_then(|app| app.user)
        .unwrap_or_else(|| String::from("You"));

    let mut ledger = Ledger::builder(FileStore::new(&store_path))
        .user_name(&user_name)
        .build()
        .await?;
    tracing::debug!("loaded {} groups from {store_path}", ledger.groups().count());

    match cli.command {
        Command::Group(GroupCmd {
            command: GroupCommand::Create(args),
        }) => {
            let currency = match Currency::try_from(args.currency.as_str()) {
                Ok(currency) => currency,
                Err(err) => {
                    eprintln!("{err}");
                    std::process::exit(2);
                }
            };
            let group_id = ledger
                .create_group(&args.name, &args.members, Some(currency))
                .await?;
            println!("created group: {} ({group_id})", args.name);
        }
        Command::Group(GroupCmd {
            command: GroupCommand::List,
        }) => {
            for group in ledger.groups() {
                println!(
                    "{}  {} ({}, {} members, {} open expenses)",
                    group.id,
                    group.name,
                    group.currency,
                    group.members.len(),
                    group.expenses.len()
                );
            }
        }
        Command::Group(GroupCmd {
            command: GroupCommand::Delete(args),
        }) => {
            let group_id = resolve_group_id(&ledger, &args.group)?;
            ledger.delete_group(&group_id).await?;
            println!("deleted group: {group_id}");
        }
        Command::Member(MemberCmd {
            command: MemberCommand::Add(args),
        }) => {
            let group_id = resolve_group_id(&ledger, &args.group)?;
            ledger.add_member(&group_id, &args.name).await?;
            println!("added member: {}", args.name);
        }
        Command::Member(MemberCmd {
            command: MemberCommand::Remove(args),
        }) => {
            let group_id = resolve_group_id(&ledger, &args.group)?;
            let member_id = resolve_member(ledger.group(&group_id)?, &args.name)?;
            ledger.remove_member(&group_id, member_id).await?;
            println!("removed member: {}", args.name);
        }
        Command::Expense(ExpenseCmd {
            command: ExpenseCommand::Add(args),
        }) => {
            let group_id = resolve_group_id(&ledger, &args.group)?;
            let amount: MoneyCents = args.amount.parse()?;
            let (paid_by, split) = {
                let group = ledger.group(&group_id)?;
                let paid_by = resolve_member(group, &args.paid_by)?;
                let split = if args.split.is_empty() {
                    group.members.iter().map(|member| member.id).collect()
                } else {
                    args.split
                        .iter()
                        .map(|name| resolve_member(group, name))
                        .collect::<Result<Vec<Uuid>, _>>()?
                };
                (paid_by, split)
            };
            let expense_id = ledger
                .add_expense(&group_id, &args.description, amount, paid_by, split)
                .await?;
            println!("added expense: {} ({expense_id})", args.description);
        }
        Command::Expense(ExpenseCmd {
            command: ExpenseCommand::Delete(args),
        }) => {
            let group_id = resolve_group_id(&ledger, &args.group)?;
            ledger.delete_expense(&group_id, args.id).await?;
            println!("deleted expense: {}", args.id);
        }
        Command::Balances(args) => {
            let group_id = resolve_group_id(&ledger, &args.group)?;
            let group = ledger.group(&group_id)?;
            let balances = ledger.balances(&group_id)?;
            let mut entries: Vec<_> = balances.iter().collect();
            entries.sort_by_key(|(_, balance)| -balance.cents());
            for (member_id, balance) in entries {
                println!(
                    "{}: {} {}",
                    member_label(group, *member_id),
                    balance,
                    group.currency
                );
            }
        }
        Command::Debts(args) => {
            let group_id = resolve_group_id(&ledger, &args.group)?;
            let group = ledger.group(&group_id)?;
            let debts = ledger.debts(&group_id)?;
            if debts.is_empty() {
                println!("all settled");
            }
            for transfer in debts {
                println!(
                    "{} pays {}: {} {}",
                    member_label(group, transfer.from),
                    member_label(group, transfer.to),
                    transfer.amount,
                    group.currency
                );
            }
        }
        Command::Settle(args) => {
            let group_id = resolve_group_id(&ledger, &args.group)?;
            ledger.settle_up(&group_id).await?;
            println!("settled up: open expenses cleared");
        }
    }

    Ok(())
}
