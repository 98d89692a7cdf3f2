use diary_core::record::join_tags;
use diary_core::DiaryRecord;

use crate::app::AppContext;
use crate::cli::AddArgs;
use crate::errors::CliError;
use crate::helpers::{parse_datetime, read_body, read_title};
use crate::ui::{receipt, Spinner};

pub async fn handle_add(ctx: &AppContext<'_>, args: &AddArgs) -> anyhow::Result<()> {
    let ui = ctx.ui_context(false, None);

    let title = read_title(args.no_input, args.title.clone())?;
    let body = read_body(args.no_input, args.body.clone())?;
    let mut record = DiaryRecord::new(title, body, join_tags(&args.tag));
    if let Some(date) = args.date.as_deref() {
        record = record.with_timestamp(parse_datetime(date)?);
    }
    record
        .validate()
        .map_err(|e| CliError::invalid_input(e.to_string()))?;

    let store = ctx.store()?;
    let registry = ctx.registry()?;
    let session = ctx.session(false, args.no_input).await?;

    let spinner = Spinner::start(&ui, "Sealing entry");
    let result = session.submit(&store, &registry, &record).await;
    spinner.finish();
    let submitted = result?;

    if ctx.quiet() {
        println!("{}", submitted.content_id);
        return Ok(());
    }

    println!(
        "{}",
        receipt(
            &ui,
            "Entry sealed",
            &[
                ("CID", submitted.content_id.as_str()),
                ("Tx", submitted.transaction_id.as_str()),
                ("Title", record.title.as_str()),
            ],
        )
    );
    Ok(())
}
