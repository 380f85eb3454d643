use super::print_output;
use crate::cli::Cli;
use crate::exit_codes::EXIT_SUCCESS;
use anyhow::Result;
use planboard::{activity::ListActivity, Execute, PlanContext};

pub async fn run(
    cli: &Cli,
    ctx: &PlanContext,
    limit: Option<usize>,
    entity: Option<&str>,
) -> Result<i32> {
    let mut command = ListActivity::new();
    command.limit = limit;
    command.entity = entity.map(str::to_string);

    let listed = command.execute(ctx).await.into_result()?;
    print_output(cli.format, &listed)?;
    Ok(EXIT_SUCCESS)
}
