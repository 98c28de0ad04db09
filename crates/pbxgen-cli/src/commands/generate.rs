use super::{
    describe_error, dim, emphasize, json_pretty, resolve_blueprint, success_mark, EXIT_SUCCESS,
};
use pbxgen_core::{GenerateOptions, GenerateResult, Generator};
use std::path::Path;

pub struct GenerateArgs<'a> {
    pub preset: Option<&'a str>,
    pub blueprint: Option<&'a Path>,
    pub output_dir: &'a Path,
    pub seed: Option<u64>,
    pub stdout: bool,
}

fn print_summary(result: &GenerateResult) {
    println!(
        "{} created Xcode project file at {}",
        success_mark(),
        emphasize(&result.path.display().to_string())
    );
    for target in &result.targets {
        println!(
            "  {} target: {} {}",
            target.platform,
            target.name,
            dim(&format!("({})", target.bundle_identifier))
        );
    }

    let bundle = result.path.parent().unwrap_or(result.path.as_path());
    println!();
    println!("next steps:");
    println!("  1. open {} in Xcode", bundle.display());
    match result.targets.as_slice() {
        [only] => println!("  2. build and run '{}'", only.name),
        targets => {
            let names: Vec<String> = targets.iter().map(|t| format!("'{}'", t.name)).collect();
            println!("  2. select {} from the scheme menu", names.join(" or "));
            println!("  3. build and run for the chosen platform");
        }
    }
}

pub fn run(args: &GenerateArgs<'_>, json: bool) -> Result<u8, String> {
    let bp = resolve_blueprint(args.preset, args.blueprint)?;
    let options = GenerateOptions {
        seed: args.seed,
        dry_run: args.stdout,
    };
    let result = Generator::new(args.output_dir)
        .generate(&bp, options)
        .map_err(|e| describe_error(&e))?;

    if args.stdout {
        print!("{}", result.manifest);
    } else if json {
        println!("{}", json_pretty(&result)?);
    } else {
        print_summary(&result);
    }
    Ok(EXIT_SUCCESS)
}
