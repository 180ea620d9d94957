use blueprint_sched::*;

fn print_reports(args: &Args, scenario_list: &ScenarioList) {
    match scenario_list.best_per_scenario(args.sum_horizon, usize::MAX, args.verbose) {
        Ok(bests) => {
            dbg!(scenario_list.weighted_sum(&bests));
        }
        Err(error) => eprintln!("Weighted-sum report failed:\n{error:#?}"),
    }

    match scenario_list.best_per_scenario(args.product_horizon, args.product_cutoff, args.verbose)
    {
        Ok(bests) => {
            dbg!(ScenarioList::product(&bests));
        }
        Err(error) => eprintln!("Product report failed:\n{error:#?}"),
    }
}

fn main() {
    let args: Args = Args::parse();
    let input_file_path: &str = args.input_file_path("input/scenarios.txt");

    if let Err(err) =
        // SAFETY: This operation is unsafe, we're just hoping nobody else touches the file while
        // this program is executing
        unsafe {
            open_utf8_file(input_file_path, |input: &str| {
                match ScenarioList::try_from(input) {
                    Ok(scenario_list) => print_reports(&args, &scenario_list),
                    Err(error) => eprintln!("Failed to parse scenario list:\n{error:#?}"),
                }
            })
        }
    {
        eprintln!(
            "Encountered error {} when opening file \"{}\"",
            err, input_file_path
        );
    }
}
