use crate::{cli::TariffArgs, prelude::*, tables::build_tariff_table};

pub fn run(args: &TariffArgs) -> Result {
    let tariff = args.load()?;
    println!("{}", build_tariff_table(&tariff));
    Ok(())
}
