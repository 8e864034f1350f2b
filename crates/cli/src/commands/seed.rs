use antar_db::{
    connect_with_settings, migrations, SampleReservations, SeedResult, SqlReservationRepository,
};

use crate::commands::{prepare, CommandResult, StepFailure};

pub const DEFAULT_COUNT: usize = 10;

pub fn run(count: usize) -> CommandResult {
    let (config, runtime) = match prepare("seed") {
        Ok(prepared) => prepared,
        Err(failure) => return failure,
    };

    let result = runtime.block_on(async {
        let pool = connect_with_settings(
            &config.database.url,
            config.database.max_connections,
            config.database.timeout_secs,
        )
        .await
        .map_err(|error| ("db_connectivity", error.to_string(), 4u8))?;

        migrations::run_pending(&pool)
            .await
            .map_err(|error| ("migration", error.to_string(), 5u8))?;

        let repository = SqlReservationRepository::new(pool.clone());
        let seeded = SampleReservations::new(count)
            .seed(&repository)
            .await
            .map_err(|error| ("seed_execution", error.to_string(), 5u8));

        pool.close().await;
        Ok::<SeedResult, StepFailure>(seeded?)
    });

    match result {
        Ok(seeded) => CommandResult::success("seed", summary(&seeded)),
        Err((error_class, message, exit_code)) => {
            CommandResult::failure("seed", error_class, message, exit_code)
        }
    }
}

fn summary(seeded: &SeedResult) -> String {
    if seeded.codes.is_empty() {
        return "no sample reservations requested".to_string();
    }
    format!("inserted {} sample reservations: {}", seeded.inserted, seeded.codes.join(", "))
}
