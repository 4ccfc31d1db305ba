use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand, ValueEnum};
use competency_console::api::types::{
    BusinessDivision, Competency, CreateJobs, CredentialChange, DeleteJobs, Department, Employee, Evaluation, JobRole,
    RoleCompetencyScore,
};
use competency_console::api::{Entity, auth, crud, employees, jobs, stats};
use competency_console::config::{ClientConfig, ConfigError};
use competency_console::error::ApiError;
use competency_console::http::{ApiClient, ReqwestTransport};
use competency_console::nav::menu_for;
use competency_console::routes::{Route, RouteGuard};
use competency_console::session::{FileStorage, SessionStore};
use serde::Serialize;
use serde_json::{Value, json};
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("not logged in; run `cms login` first")]
    NotLoggedIn,
    #[error("invalid {resource} key: {key}")]
    InvalidKey { resource: &'static str, key: String },
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("{}", api_message(.0))]
    Api(#[from] ApiError),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

fn api_message(error: &ApiError) -> String {
    match error.detail() {
        Some(detail) => format!("{error}: {detail} [{}]", error.error_code()),
        None => format!("{error} [{}]", error.error_code()),
    }
}

#[derive(Parser, Debug)]
#[command(name = "cms", about = "Competency management console")]
struct Cli {
    #[arg(long, env = "CMS_API_BASE_URL")]
    base_url: Option<String>,

    #[arg(long, env = "CMS_SESSION_FILE")]
    session_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sign in and store the session.
    Login {
        #[arg(long)]
        employee_number: String,
        #[arg(long, env = "CMS_PASSWORD", hide_env_values = true)]
        password: String,
    },
    Logout,
    Whoami,
    /// Screens available to the signed-in role.
    Menu,
    /// Evaluate navigation to a console path.
    Open { path: String },
    /// Change password and/or e-mail.
    Credentials {
        #[arg(long)]
        employee_number: String,
        #[arg(long, env = "CMS_PASSWORD", hide_env_values = true)]
        old_password: String,
        #[arg(long)]
        new_password: Option<String>,
        #[arg(long)]
        new_email: Option<String>,
    },
    Api(ApiCommand),
    Jobs(JobsCommand),
    Employees(EmployeesCommand),
    Stats(StatsCommand),
}

#[derive(Args, Debug)]
struct ApiCommand {
    #[arg(value_enum)]
    resource: Resource,
    #[command(subcommand)]
    action: CrudAction,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Resource {
    BusinessDivisions,
    Departments,
    Roles,
    Competencies,
    Employees,
}

#[derive(Subcommand, Debug)]
enum CrudAction {
    List,
    Read {
        key: String,
    },
    Create {
        #[arg(long)]
        data: String,
    },
    Update {
        key: String,
        #[arg(long)]
        data: String,
    },
    Delete {
        key: String,
    },
}

#[derive(Args, Debug)]
struct JobsCommand {
    #[command(subcommand)]
    command: JobsSubcommand,
}

#[derive(Subcommand, Debug)]
enum JobsSubcommand {
    Summary,
    Create {
        #[arg(long)]
        role_code: String,
        #[arg(long)]
        job_name: String,
        #[arg(long)]
        prefix: String,
        #[arg(long, default_value_t = 1)]
        start: u32,
        #[arg(long)]
        count: u32,
    },
    Delete {
        #[arg(long)]
        role_code: String,
        #[arg(long)]
        job_name: String,
        #[arg(long)]
        count: u32,
    },
    ByRole {
        role_code: String,
        job_name: String,
    },
    Available {
        role_code: String,
        #[arg(long)]
        employee_number: String,
    },
    Activate {
        #[arg(required = true)]
        job_codes: Vec<String>,
    },
    Deactivate {
        #[arg(required = true)]
        job_codes: Vec<String>,
    },
    AssignCompetencies {
        role_id: i64,
        #[arg(required = true)]
        competency_codes: Vec<String>,
    },
    RemoveCompetencies {
        role_id: i64,
        #[arg(required = true)]
        competency_codes: Vec<String>,
    },
    RoleScores {
        role_id: i64,
    },
    /// Set required scores, e.g. `--data '[{"competency_code":"C01","role_competency_required_score":3}]'`.
    SetRoleScores {
        role_id: i64,
        #[arg(long)]
        data: String,
    },
}

#[derive(Args, Debug)]
struct EmployeesCommand {
    #[command(subcommand)]
    command: EmployeesSubcommand,
}

#[derive(Subcommand, Debug)]
enum EmployeesSubcommand {
    /// Import an employee spreadsheet.
    Upload { file: PathBuf },
    SendForEvaluation {
        #[arg(required = true)]
        employee_numbers: Vec<String>,
    },
    Managers,
    Team,
    /// Profile and competency scores of one employee.
    Details { employee_number: String },
    DepartmentRoles { department_id: i64 },
    Evaluate {
        employee_number: String,
        #[arg(long)]
        data: String,
    },
}

#[derive(Args, Debug)]
struct StatsCommand {
    #[command(subcommand)]
    command: StatsSubcommand,
}

#[derive(Subcommand, Debug)]
enum StatsSubcommand {
    Overall,
    Department { department_id: i64 },
    Manager { manager_number: String },
    Mine,
    /// Gap counts per competency.
    Gaps,
    /// Employees ranked by gap on one competency.
    CompetencyGaps { competency_code: String },
    /// Every evaluated employee/competency score.
    EmployeeCompetencies,
    /// Score totals for one employee.
    Totals { employee_number: String },
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(Cli::parse()).await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let client = build_client(cli.base_url.as_deref(), cli.session_file)?;

    match cli.command {
        Command::Login { employee_number, password } => {
            let session = auth::login(&client, &employee_number, &password).await?;
            print_json(&json!({ "username": session.username, "role": session.role }))
        }
        Command::Logout => {
            let cleared = auth::logout(&client);
            print_json(&json!({ "logged_out": cleared }))
        }
        Command::Whoami => {
            let session = client.session().current().ok_or(CliError::NotLoggedIn)?;
            print_json(&json!({ "username": session.username, "role": session.role }))
        }
        Command::Menu => {
            let role = client.session().role().ok_or(CliError::NotLoggedIn)?;
            let items: Vec<Value> = menu_for(role)
                .into_iter()
                .map(|item| json!({ "label": item.label, "path": item.route.path() }))
                .collect();
            print_json(&items)
        }
        Command::Open { path } => {
            let route = Route::parse(&path);
            let decision = RouteGuard::new(Arc::clone(client.session())).check(&route);
            print_json(&json!({
                "requested": route.path(),
                "decision": format!("{decision:?}"),
                "target": decision.target(&route).path(),
            }))
        }
        Command::Credentials { employee_number, old_password, new_password, new_email } => {
            let change = CredentialChange { employee_number, old_password, new_password, new_email };
            print_json(&auth::change_credentials(&client, &change).await?)
        }
        Command::Api(api) => run_api(&client, api).await,
        Command::Jobs(command) => run_jobs(&client, command).await,
        Command::Employees(command) => run_employees(&client, command).await,
        Command::Stats(command) => run_stats(&client, command).await,
    }
}

fn build_client(base_url: Option<&str>, session_file: Option<PathBuf>) -> Result<ApiClient, CliError> {
    let mut config = ClientConfig::from_env()?;
    if let Some(base_url) = base_url {
        config = ClientConfig::new(base_url, config.session_file, config.timeouts)?;
    }
    if let Some(session_file) = session_file {
        config.session_file = session_file;
    }

    let transport = ReqwestTransport::new(config.timeouts)?;
    let store = SessionStore::open(Arc::new(FileStorage::new(&config.session_file)));
    Ok(ApiClient::new(
        config,
        Arc::new(transport),
        Arc::new(store),
        Arc::new(|| eprintln!("session expired; run `cms login` again")),
    ))
}

async fn run_api(client: &ApiClient, api: ApiCommand) -> Result<(), CliError> {
    match api.resource {
        Resource::BusinessDivisions => run_crud::<BusinessDivision>(client, api.action).await,
        Resource::Departments => run_crud::<Department>(client, api.action).await,
        Resource::Roles => run_crud::<JobRole>(client, api.action).await,
        Resource::Competencies => run_crud::<Competency>(client, api.action).await,
        Resource::Employees => run_crud::<Employee>(client, api.action).await,
    }
}

async fn run_crud<E: Entity>(client: &ApiClient, action: CrudAction) -> Result<(), CliError> {
    let parse_key = |key: String| key.parse::<E::Key>().map_err(|_| CliError::InvalidKey { resource: E::LABEL, key });

    match action {
        CrudAction::List => print_json(&crud::list::<E>(client).await?),
        CrudAction::Read { key } => print_json(&crud::get::<E>(client, &parse_key(key)?).await?),
        CrudAction::Create { data } => {
            let draft: E::Draft = serde_json::from_str(&data)?;
            print_json(&crud::create::<E>(client, &draft).await?)
        }
        CrudAction::Update { key, data } => {
            let key = parse_key(key)?;
            let draft: E::Draft = serde_json::from_str(&data)?;
            print_json(&crud::update::<E>(client, &key, &draft).await?)
        }
        CrudAction::Delete { key } => {
            crud::delete::<E>(client, &parse_key(key)?).await?;
            print_json(&json!({ "deleted": true }))
        }
    }
}

async fn run_jobs(client: &ApiClient, command: JobsCommand) -> Result<(), CliError> {
    match command.command {
        JobsSubcommand::Summary => print_json(&jobs::summary(client).await?),
        JobsSubcommand::Create { role_code, job_name, prefix, start, count } => {
            let request = CreateJobs { role_code, job_name, prefix, start, count };
            print_json(&jobs::create(client, &request).await?)
        }
        JobsSubcommand::Delete { role_code, job_name, count } => {
            let request = DeleteJobs { job_name, role_code, count };
            print_json(&jobs::delete(client, &request).await?)
        }
        JobsSubcommand::ByRole { role_code, job_name } => {
            print_json(&jobs::by_role(client, &role_code, &job_name).await?)
        }
        JobsSubcommand::Available { role_code, employee_number } => {
            print_json(&jobs::available_codes(client, &role_code, &employee_number).await?)
        }
        JobsSubcommand::Activate { job_codes } => print_json(&jobs::activate(client, &job_codes).await?),
        JobsSubcommand::Deactivate { job_codes } => print_json(&jobs::deactivate(client, &job_codes).await?),
        JobsSubcommand::AssignCompetencies { role_id, competency_codes } => {
            print_json(&jobs::assign_competencies(client, role_id, &competency_codes).await?)
        }
        JobsSubcommand::RemoveCompetencies { role_id, competency_codes } => {
            print_json(&jobs::remove_competencies(client, role_id, &competency_codes).await?)
        }
        JobsSubcommand::RoleScores { role_id } => print_json(&jobs::competency_scores(client, role_id).await?),
        JobsSubcommand::SetRoleScores { role_id, data } => {
            let scores: Vec<RoleCompetencyScore> = serde_json::from_str(&data)?;
            print_json(&jobs::update_competency_scores(client, role_id, &scores).await?)
        }
    }
}

async fn run_employees(client: &ApiClient, command: EmployeesCommand) -> Result<(), CliError> {
    match command.command {
        EmployeesSubcommand::Upload { file } => print_json(&employees::upload_file(client, &file).await?),
        EmployeesSubcommand::SendForEvaluation { employee_numbers } => {
            print_json(&employees::send_for_evaluation(client, &employee_numbers).await?)
        }
        EmployeesSubcommand::Managers => print_json(&employees::managers(client).await?),
        EmployeesSubcommand::Team => print_json(&employees::my_team(client).await?),
        EmployeesSubcommand::Details { employee_number } => {
            print_json(&employees::details(client, &employee_number).await?)
        }
        EmployeesSubcommand::DepartmentRoles { department_id } => {
            print_json(&employees::department_roles(client, department_id).await?)
        }
        EmployeesSubcommand::Evaluate { employee_number, data } => {
            let evaluation: Evaluation = serde_json::from_str(&data)?;
            print_json(&employees::submit_evaluation(client, &employee_number, &evaluation).await?)
        }
    }
}

async fn run_stats(client: &ApiClient, command: StatsCommand) -> Result<(), CliError> {
    match command.command {
        StatsSubcommand::Overall => print_json(&stats::overall(client).await?),
        StatsSubcommand::Department { department_id } => {
            print_json(&stats::by_department(client, department_id).await?)
        }
        StatsSubcommand::Manager { manager_number } => print_json(&stats::by_manager(client, &manager_number).await?),
        StatsSubcommand::Mine => print_json(&stats::my_scores(client).await?),
        StatsSubcommand::Gaps => print_json(&stats::competency_gaps(client).await?),
        StatsSubcommand::CompetencyGaps { competency_code } => {
            print_json(&stats::gaps_for_competency(client, &competency_code).await?)
        }
        StatsSubcommand::EmployeeCompetencies => print_json(&stats::employee_competencies(client).await?),
        StatsSubcommand::Totals { employee_number } => print_json(&stats::score_totals(client, &employee_number).await?),
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
