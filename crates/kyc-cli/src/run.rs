//! `kyc run`: verify a whole form in one pass.
//!
//! Order: enter every value, generate the OTP, enter and verify the OTP
//! from the input file, then verify the remaining categories concurrently.
//! Prints the session snapshot and every submit report as JSON.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use kyc_client::{
    MockVerificationApi, ProviderClient, ProviderConfig, RecordsClient, RecordsConfig,
    VerificationApi,
};
use kyc_core::{ClientId, FieldKind};
use kyc_state::{
    FileFlagStore, FlagSink, LogSink, Notifier, RecordSink, SessionConfig, SessionSnapshot,
    SubmitReport, SubmitTarget, VerificationSession, Verifier,
};

use crate::input::{load_input, KycInput};

/// Run subcommand arguments.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Form values (YAML or JSON).
    #[arg(long)]
    pub input: PathBuf,

    /// Use the in-process mock provider instead of the live one.
    #[arg(long)]
    pub mock: bool,

    /// Client the session belongs to. Overrides `clientId` in the input.
    #[arg(long)]
    pub client_id: Option<String>,

    /// Persist the completion flag to this JSON file.
    #[arg(long)]
    pub flag_store: Option<PathBuf>,

    /// Report completion to the client records endpoint (KYC_RECORDS_*).
    #[arg(long)]
    pub report_records: bool,
}

/// Printed result of a run.
#[derive(Debug, Serialize)]
pub struct RunSummary {
    pub snapshot: SessionSnapshot,
    pub reports: Vec<SubmitReport>,
}

/// Execute the run subcommand. Exit code 0 when the session ends fully
/// verified, 1 otherwise.
pub fn run_run(args: &RunArgs) -> Result<u8> {
    let input = load_input(&args.input)?;

    let api: Arc<dyn VerificationApi> = if args.mock {
        Arc::new(MockVerificationApi::new())
    } else {
        let config = ProviderConfig::from_env().context("provider configuration")?;
        Arc::new(ProviderClient::new(config)?)
    };
    tracing::info!(api = api.api_name(), "verification api selected");

    let mut notifier = Notifier::new().with_sink(Arc::new(LogSink));
    if let Some(path) = &args.flag_store {
        notifier = notifier.with_sink(Arc::new(FlagSink::new(Arc::new(FileFlagStore::new(
            path.clone(),
        )))));
    }
    if args.report_records {
        let config = RecordsConfig::from_env().context("records configuration")?;
        notifier = notifier.with_sink(Arc::new(RecordSink::new(RecordsClient::new(config)?)));
    }

    let client_id = args.client_id.clone().or_else(|| input.client_id.clone());
    let session = new_session(&input, client_id)?;
    let verifier = Verifier::new(api, notifier);

    let runtime = tokio::runtime::Runtime::new().context("failed to start async runtime")?;
    let summary = runtime.block_on(execute(&verifier, session, &input))?;

    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(if summary.snapshot.fully_verified { 0 } else { 1 })
}

fn new_session(input: &KycInput, client_id: Option<String>) -> Result<VerificationSession> {
    let config = SessionConfig {
        otp_expiry: input.otp_expiry.unwrap_or_default(),
    };
    let session = VerificationSession::new(config);
    Ok(match client_id {
        Some(id) => session.with_client_id(ClientId::new(id)?),
        None => session,
    })
}

/// Drive one session through the whole form.
pub async fn execute<A>(
    verifier: &Verifier<A>,
    mut session: VerificationSession,
    input: &KycInput,
) -> Result<RunSummary>
where
    A: VerificationApi + ?Sized,
{
    for (kind, value) in input.form_values() {
        session.edit_field(kind, value);
    }

    let mut reports = Vec::new();
    let generated = verifier
        .submit(&mut session, SubmitTarget::GenerateOtp)
        .await?;
    let otp_requested = generated.is_verified();
    reports.push(generated);

    if otp_requested {
        if let Some(otp) = &input.otp {
            session.edit_field(FieldKind::Otp, otp);
        }
        reports.push(
            verifier
                .submit(&mut session, SubmitTarget::VerifyOtp)
                .await?,
        );
    }

    reports.extend(
        verifier
            .submit_all(&mut session, &SubmitTarget::INDEPENDENT)
            .await?,
    );

    for report in &reports {
        tracing::debug!(target_name = %report.target, result = ?report.result, "submit finished");
    }

    Ok(RunSummary {
        snapshot: session.snapshot(),
        reports,
    })
}
