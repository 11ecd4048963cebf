//! EKOS CLI — command-line client for the equipment-inspection backend.
//!
//! Set EKOS_API_URL (or API_URL) and either run `ekos login` or export
//! EKOS_TOKEN with a bearer token from an earlier login.

use anyhow::Context;
use chrono::Utc;
use clap::{Parser, Subcommand};
use serde::Serialize;

use ekos_api_client::ApiClient;
use ekos_app::{
    load_expiry_overview, AttachmentManager, ComponentCatalog, ComponentFilter, DashboardSummary,
    Preview, ReportCollection, ReportFilter, ReportForm, StagedFile,
};
use ekos_cli::{format_size, init_tracing};
use ekos_app::components::embed_component_image;
use ekos_core::models::{
    CategoryDraft, ComplianceStatus, InspectionPeriod, ProjectDraft, RegisterRequest, Role,
    ScaffoldComponentDraft,
};
use ekos_core::validation::FileSlot;

#[derive(Parser)]
#[command(name = "ekos", about = "EKOS equipment-inspection CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and print the bearer token for EKOS_TOKEN
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Register a new account (email verification happens out of band)
    Register {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        /// Account role: admin, inspector, or viewer
        #[arg(long, default_value = "viewer")]
        role: String,
    },
    /// Confirm an emailed verification code
    VerifyEmail {
        #[arg(long)]
        email: String,
        #[arg(long)]
        code: String,
    },
    /// Request a fresh verification code
    ResendCode {
        #[arg(long)]
        email: String,
    },
    /// Show the current user profile
    Me,
    /// Report operations
    Reports {
        #[command(subcommand)]
        sub: ReportCommands,
    },
    /// Attachment operations
    Files {
        #[command(subcommand)]
        sub: FileCommands,
    },
    /// Dashboard summary with derived percentages
    Stats,
    /// Reports expiring within 30 days and already expired ones
    Expiry,
    /// Scaffold component catalogue
    Components {
        #[command(subcommand)]
        sub: ComponentCommands,
    },
    /// Category reference list
    Categories {
        #[command(subcommand)]
        sub: RefCommands,
    },
    /// Project reference list
    Projects {
        #[command(subcommand)]
        sub: RefCommands,
    },
    /// Static city list
    Cities,
    /// User management (admin)
    Users {
        #[command(subcommand)]
        sub: UserCommands,
    },
}

#[derive(Subcommand)]
enum ReportCommands {
    /// List reports under the active filter
    List {
        /// Free-text search over report no, equipment name, and firm
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        category: Option<String>,
        /// Inspection period in months: 3, 6, or 12
        #[arg(long)]
        period: Option<u8>,
        /// Compliance filter: uygun or uygun-degil
        #[arg(long)]
        compliance: Option<String>,
        /// Client-side project scoping
        #[arg(long)]
        project: Option<String>,
        #[arg(long)]
        limit: Option<u32>,
        /// Page of the filtered set (20 rows per page)
        #[arg(long)]
        page: Option<usize>,
    },
    Show {
        id: String,
    },
    /// Create a report; staged files upload after the record is durable
    Create {
        #[arg(long)]
        project: String,
        #[arg(long)]
        city: Option<String>,
        #[arg(long)]
        equipment: String,
        #[arg(long)]
        category: String,
        #[arg(long)]
        firm: String,
        #[arg(long)]
        sub_category: Option<String>,
        #[arg(long)]
        location: Option<String>,
        #[arg(long)]
        brand_model: Option<String>,
        #[arg(long)]
        serial_no: Option<String>,
        #[arg(long)]
        period: Option<u8>,
        /// Validity date, YYYY-MM-DD
        #[arg(long)]
        valid_until: Option<String>,
        #[arg(long)]
        compliance: Option<String>,
        #[arg(long)]
        notes: Option<String>,
        /// Image files to stage (jpeg/png)
        #[arg(long = "image")]
        images: Vec<std::path::PathBuf>,
        /// Document files to stage (pdf/doc/docx)
        #[arg(long = "document")]
        documents: Vec<std::path::PathBuf>,
    },
    Delete {
        id: String,
    },
    /// Delete several reports through the batch endpoint
    BulkDelete {
        ids: Vec<String>,
    },
    /// Flip Aktif⇄Pasif
    Toggle {
        id: String,
    },
    /// Download the Excel export
    Export {
        #[arg(long, default_value = "raporlar.xlsx")]
        output: std::path::PathBuf,
    },
}

#[derive(Subcommand)]
enum FileCommands {
    List {
        report_id: String,
    },
    Upload {
        report_id: String,
        file: std::path::PathBuf,
    },
    Download {
        report_id: String,
        attachment_id: String,
        #[arg(long)]
        output: Option<std::path::PathBuf>,
    },
    /// Resolve and describe the preview for an attachment
    Preview {
        report_id: String,
        attachment_id: String,
    },
    Delete {
        report_id: String,
        attachment_id: String,
    },
}

#[derive(Subcommand)]
enum ComponentCommands {
    List {
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        firm: Option<String>,
        #[arg(long)]
        compliance: Option<String>,
        #[arg(long)]
        project: Option<String>,
        #[arg(long)]
        page: Option<usize>,
    },
    /// Distinct firm names for the filter control
    Firms,
    /// Add a component with up to 3 embedded preview images
    Add {
        #[arg(long)]
        project: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        material_code: String,
        #[arg(long, default_value = "1")]
        quantity: u32,
        #[arg(long)]
        firm: String,
        /// Validity date, YYYY-MM-DD
        #[arg(long)]
        valid_until: Option<String>,
        #[arg(long)]
        compliance: Option<String>,
        #[arg(long)]
        notes: Option<String>,
        /// Preview images to embed (jpeg/png, max 3)
        #[arg(long = "image")]
        images: Vec<std::path::PathBuf>,
    },
    BulkDelete {
        ids: Vec<String>,
    },
    Export {
        #[arg(long, default_value = "iskele_bilesenleri.xlsx")]
        output: std::path::PathBuf,
    },
}

#[derive(Subcommand)]
enum RefCommands {
    List,
    Create {
        name: String,
        #[arg(long)]
        description: Option<String>,
    },
    Delete {
        id: String,
    },
}

#[derive(Subcommand)]
enum UserCommands {
    List,
    Delete {
        id: String,
    },
    BulkDelete {
        ids: Vec<String>,
    },
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize response")?;
    println!("{}", out);
    Ok(())
}

fn parse_period(months: Option<u8>) -> anyhow::Result<Option<InspectionPeriod>> {
    match months {
        None => Ok(None),
        Some(3) => Ok(Some(InspectionPeriod::ThreeMonthly)),
        Some(6) => Ok(Some(InspectionPeriod::SixMonthly)),
        Some(12) => Ok(Some(InspectionPeriod::TwelveMonthly)),
        Some(other) => anyhow::bail!("invalid period '{other}': expected 3, 6, or 12"),
    }
}

fn parse_role(value: &str) -> anyhow::Result<Role> {
    match value {
        "admin" => Ok(Role::Admin),
        "inspector" => Ok(Role::Inspector),
        "viewer" => Ok(Role::Viewer),
        other => anyhow::bail!("invalid role '{other}': expected admin, inspector, or viewer"),
    }
}

fn parse_compliance(value: Option<&str>) -> anyhow::Result<Option<ComplianceStatus>> {
    match value {
        None => Ok(None),
        Some("uygun") => Ok(Some(ComplianceStatus::Compliant)),
        Some("uygun-degil") => Ok(Some(ComplianceStatus::NonCompliant)),
        Some(other) => anyhow::bail!("invalid compliance '{other}': expected uygun or uygun-degil"),
    }
}

/// Make sure a profile is attached to the session: a token installed from the
/// environment has no user until `/auth/me` answers.
async fn hydrate(client: &ApiClient) -> anyhow::Result<()> {
    if !client.session().is_authenticated() {
        anyhow::bail!("Not logged in. Run `ekos login` or set EKOS_TOKEN.");
    }
    if client.session().user().is_none() {
        client
            .me()
            .await
            .context("Session is no longer valid; log in again")?;
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    dotenvy::dotenv().ok();

    let client =
        ApiClient::from_env().context("Failed to create API client. Set EKOS_API_URL")?;
    if let Ok(token) = std::env::var("EKOS_TOKEN") {
        client.session().install_token(token);
    }

    let cli = Cli::parse();

    match cli.command {
        Commands::Login { email, password } => {
            let user = client.login(&email, &password).await?;
            let token = client.session().token().unwrap_or_default();
            print_json(&serde_json::json!({ "user": user, "access_token": token }))?;
            eprintln!("export EKOS_TOKEN={token}");
        }
        Commands::Register {
            username,
            email,
            password,
            role,
        } => {
            let request = RegisterRequest {
                username,
                email,
                password: password.clone(),
                password_confirm: password,
                role: parse_role(&role)?,
            };
            print_json(&client.register(&request).await?)?;
        }
        Commands::VerifyEmail { email, code } => {
            let response = client.verify_email(&email, &code).await?;
            print_json(&serde_json::json!({ "message": response.message }))?;
        }
        Commands::ResendCode { email } => {
            let response = client.resend_verification_code(&email).await?;
            print_json(&serde_json::json!({ "message": response.message }))?;
        }
        Commands::Me => {
            if !client.session().is_authenticated() {
                anyhow::bail!("Not logged in. Run `ekos login` or set EKOS_TOKEN.");
            }
            print_json(&client.me().await?)?;
        }
        Commands::Reports { sub } => {
            hydrate(&client).await?;
            run_reports(client, sub).await?;
        }
        Commands::Files { sub } => {
            hydrate(&client).await?;
            run_files(client, sub).await?;
        }
        Commands::Stats => {
            hydrate(&client).await?;
            let summary = DashboardSummary::load(&client).await?;
            print_json(&serde_json::json!({
                "stats": summary.stats(),
                "compliance_percentage": summary.compliance_percentage(),
                "category_shares": summary
                    .category_shares()
                    .iter()
                    .map(|s| serde_json::json!({
                        "kategori": s.category,
                        "count": s.count,
                        "percentage": s.percentage
                    }))
                    .collect::<Vec<_>>(),
            }))?;
        }
        Commands::Expiry => {
            hydrate(&client).await?;
            let overview = load_expiry_overview(&client, Utc::now().date_naive()).await?;
            print_json(&serde_json::json!({
                "expiring_30_days": overview.expiring.len(),
                "expired": overview.expired.len(),
                "expiring": overview.expiring,
                "expired_reports": overview.expired,
            }))?;
        }
        Commands::Components { sub } => {
            hydrate(&client).await?;
            run_components(client, sub).await?;
        }
        Commands::Categories { sub } => {
            hydrate(&client).await?;
            match sub {
                RefCommands::List => print_json(&client.list_categories().await?)?,
                RefCommands::Create { name, description } => {
                    let draft = CategoryDraft {
                        name,
                        sub_categories: Vec::new(),
                        description,
                    };
                    print_json(&client.create_category(&draft).await?)?;
                }
                RefCommands::Delete { id } => {
                    print_json(&serde_json::json!({
                        "message": client.delete_category(&id).await?.message
                    }))?;
                }
            }
        }
        Commands::Projects { sub } => {
            hydrate(&client).await?;
            match sub {
                RefCommands::List => print_json(&client.list_projects().await?)?,
                RefCommands::Create { name, description } => {
                    let draft = ProjectDraft {
                        name,
                        description,
                        ..Default::default()
                    };
                    print_json(&client.create_project(&draft).await?)?;
                }
                RefCommands::Delete { id } => {
                    print_json(&serde_json::json!({
                        "message": client.delete_project(&id).await?.message
                    }))?;
                }
            }
        }
        Commands::Cities => {
            hydrate(&client).await?;
            print_json(&client.list_cities().await?)?;
        }
        Commands::Users { sub } => {
            hydrate(&client).await?;
            match sub {
                UserCommands::List => print_json(&client.list_users().await?)?,
                UserCommands::Delete { id } => {
                    print_json(&serde_json::json!({
                        "message": client.delete_user(&id).await?.message
                    }))?;
                }
                UserCommands::BulkDelete { ids } => {
                    let response = client.bulk_delete_users(&ids).await?;
                    print_json(&serde_json::json!({
                        "message": response.message,
                        "deleted_count": response.deleted_count,
                    }))?;
                }
            }
        }
    }

    Ok(())
}

async fn run_reports(client: ApiClient, command: ReportCommands) -> anyhow::Result<()> {
    match command {
        ReportCommands::List {
            search,
            category,
            period,
            compliance,
            project,
            limit,
            page,
        } => {
            let mut collection = ReportCollection::new(client);
            collection.set_filter(ReportFilter {
                search: search.unwrap_or_default(),
                category,
                period: parse_period(period)?,
                compliance: parse_compliance(compliance.as_deref())?,
                project_id: project,
                limit,
            });
            collection.refresh().await?;
            if let Some(page) = page {
                collection.set_page(page);
            }
            let items: Vec<_> = collection.page_items().into_iter().cloned().collect();
            print_json(&serde_json::json!({
                "total": collection.visible().len(),
                "page": collection.pagination().page(),
                "reports": items,
            }))?;
        }
        ReportCommands::Show { id } => {
            print_json(&client.get_report(&id).await?)?;
        }
        ReportCommands::Create {
            project,
            city,
            equipment,
            category,
            firm,
            sub_category,
            location,
            brand_model,
            serial_no,
            period,
            valid_until,
            compliance,
            notes,
            images,
            documents,
        } => {
            let mut form = ReportForm::open(client, None).await?;
            form.set_project(&project);
            if let Some(city) = city {
                form.set_city(city);
            }
            form.set_category(&category);
            form.set_sub_category(sub_category)?;
            {
                let draft = form.draft_mut();
                draft.equipment_name = equipment;
                draft.firm = firm;
                draft.location = location;
                draft.brand_model = brand_model;
                draft.serial_no = serial_no;
                draft.notes = notes;
            }
            form.draft_mut().period = parse_period(period)?;
            form.draft_mut().compliance = parse_compliance(compliance.as_deref())?;
            if let Some(raw) = valid_until.as_deref() {
                form.draft_mut().valid_until = Some(
                    chrono::NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                        .context("valid-until must be YYYY-MM-DD")?,
                );
            }

            for rejected in form.stage_batch(FileSlot::Image, read_staged(&images)?) {
                eprintln!("{}: {}", rejected.file_name, rejected.error);
            }
            for rejected in form.stage_batch(FileSlot::Document, read_staged(&documents)?) {
                eprintln!("{}: {}", rejected.file_name, rejected.error);
            }

            let outcome = form.submit().await?;
            for failure in &outcome.failed {
                eprintln!("{} yüklenemedi: {}", failure.file_name, failure.error);
            }
            print_json(&serde_json::json!({
                "report": outcome.report,
                "uploaded": outcome.uploaded,
                "failed": outcome.failed.iter().map(|f| f.file_name.clone()).collect::<Vec<_>>(),
            }))?;
        }
        ReportCommands::Delete { id } => {
            let mut collection = ReportCollection::new(client);
            let response = collection.delete_report(&id).await?;
            print_json(&serde_json::json!({ "message": response.message }))?;
        }
        ReportCommands::BulkDelete { ids } => {
            let mut collection = ReportCollection::new(client);
            for id in &ids {
                collection.toggle_select(id);
            }
            let response = collection.bulk_delete().await?;
            print_json(&serde_json::json!({
                "message": response.message,
                "deleted_count": response.deleted_count,
            }))?;
        }
        ReportCommands::Toggle { id } => {
            let response = client.toggle_report_status(&id).await?;
            print_json(&serde_json::json!({
                "message": response.message,
                "durum": response.status.as_str(),
            }))?;
        }
        ReportCommands::Export { output } => {
            let bytes = client.export_reports_excel().await?;
            std::fs::write(&output, &bytes)
                .with_context(|| format!("Failed to write {}", output.display()))?;
            println!("{} ({})", output.display(), format_size(bytes.len() as u64));
        }
    }
    Ok(())
}

async fn run_files(client: ApiClient, command: FileCommands) -> anyhow::Result<()> {
    match command {
        FileCommands::List { report_id } => {
            let mut manager = AttachmentManager::new(client, report_id);
            manager.refresh().await?;
            let listing: Vec<_> = manager
                .attachments()
                .iter()
                .map(|a| {
                    serde_json::json!({
                        "id": a.id,
                        "dosya_adi": a.file_name,
                        "boyut": format_size(a.size_bytes),
                        "created_at": a.created_at,
                    })
                })
                .collect();
            print_json(&listing)?;
        }
        FileCommands::Upload { report_id, file } => {
            let bytes = std::fs::read(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let file_name = file
                .file_name()
                .and_then(|n| n.to_str())
                .context("Invalid file name")?;
            let mut manager = AttachmentManager::new(client, report_id);
            let response = manager.upload(file_name, bytes).await?;
            print_json(&serde_json::json!({ "message": response.message }))?;
        }
        FileCommands::Download {
            report_id,
            attachment_id,
            output,
        } => {
            let manager = AttachmentManager::new(client, report_id);
            let bytes = manager.download(&attachment_id).await?;
            let output = output.unwrap_or_else(|| std::path::PathBuf::from(&attachment_id));
            std::fs::write(&output, &bytes)
                .with_context(|| format!("Failed to write {}", output.display()))?;
            println!("{} ({})", output.display(), format_size(bytes.len() as u64));
        }
        FileCommands::Preview {
            report_id,
            attachment_id,
        } => {
            let mut manager = AttachmentManager::new(client, report_id);
            manager.refresh().await?;
            let attachment = manager
                .attachments()
                .iter()
                .find(|a| a.id == attachment_id)
                .context("Attachment not found on this report")?
                .clone();
            match manager.preview(&attachment).await? {
                Preview::Image(handle) => {
                    print_json(&serde_json::json!({
                        "strategy": "image",
                        "bytes": handle.bytes().len(),
                    }))?;
                    handle.release();
                }
                Preview::Document {
                    data_uri,
                    file_name,
                } => {
                    print_json(&serde_json::json!({
                        "strategy": "document",
                        "data_uri_length": data_uri.len(),
                        "download_fallback": file_name,
                    }))?;
                }
                Preview::Unsupported { file_name } => {
                    print_json(&serde_json::json!({
                        "strategy": "unsupported",
                        "download_only": file_name,
                    }))?;
                }
            }
        }
        FileCommands::Delete {
            report_id,
            attachment_id,
        } => {
            let mut manager = AttachmentManager::new(client, report_id);
            let response = manager.delete(&attachment_id).await?;
            print_json(&serde_json::json!({ "message": response.message }))?;
        }
    }
    Ok(())
}

async fn run_components(client: ApiClient, command: ComponentCommands) -> anyhow::Result<()> {
    match command {
        ComponentCommands::List {
            search,
            firm,
            compliance,
            project,
            page,
        } => {
            let mut catalog = ComponentCatalog::new(client);
            catalog.refresh().await?;
            catalog.set_filter(ComponentFilter {
                search: search.unwrap_or_default(),
                firm,
                compliance: parse_compliance(compliance.as_deref())?,
                project_id: project,
            });
            if let Some(page) = page {
                catalog.set_page(page);
            }
            let items: Vec<_> = catalog.page_items().into_iter().cloned().collect();
            print_json(&serde_json::json!({
                "total": catalog.visible().len(),
                "page": catalog.pagination().page(),
                "components": items,
            }))?;
        }
        ComponentCommands::Firms => {
            let mut catalog = ComponentCatalog::new(client);
            catalog.refresh().await?;
            print_json(&catalog.firms())?;
        }
        ComponentCommands::Add {
            project,
            name,
            material_code,
            quantity,
            firm,
            valid_until,
            compliance,
            notes,
            images,
        } => {
            let mut draft = ScaffoldComponentDraft {
                project_id: project,
                name,
                material_code,
                quantity,
                firm,
                notes,
                ..Default::default()
            };
            if let Some(raw) = valid_until.as_deref() {
                draft.valid_until = Some(
                    chrono::NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                        .context("valid-until must be YYYY-MM-DD")?,
                );
            }
            if let Some(compliance) = parse_compliance(compliance.as_deref())? {
                draft.compliance = compliance;
            }
            for path in &images {
                let bytes = std::fs::read(path)
                    .with_context(|| format!("Failed to read {}", path.display()))?;
                let file_name = path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .context("Invalid file name")?;
                if let Err(err) = embed_component_image(&mut draft, file_name, &bytes) {
                    eprintln!("{}: {}", file_name, err);
                }
            }
            let mut catalog = ComponentCatalog::new(client);
            let created = catalog.create(draft).await?;
            print_json(&created)?;
        }
        ComponentCommands::BulkDelete { ids } => {
            let mut catalog = ComponentCatalog::new(client);
            let response = catalog.bulk_delete(&ids).await?;
            print_json(&serde_json::json!({
                "message": response.message,
                "deleted_count": response.deleted_count,
            }))?;
        }
        ComponentCommands::Export { output } => {
            let catalog = ComponentCatalog::new(client);
            let bytes = catalog.export_excel().await?;
            std::fs::write(&output, &bytes)
                .with_context(|| format!("Failed to write {}", output.display()))?;
            println!("{} ({})", output.display(), format_size(bytes.len() as u64));
        }
    }
    Ok(())
}

fn read_staged(paths: &[std::path::PathBuf]) -> anyhow::Result<Vec<StagedFile>> {
    paths
        .iter()
        .map(|path| {
            let bytes = std::fs::read(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let file_name = path
                .file_name()
                .and_then(|n| n.to_str())
                .context("Invalid file name")?;
            Ok(StagedFile::new(file_name, bytes))
        })
        .collect()
}
