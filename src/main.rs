//! mktree's entry point.
//! Parses arguments, loads variables, interprets the tree source and either
//! prints the resulting tree or creates it on disk.

use mktree::{
    cli::{get_args, Args},
    config::{load_variables_file, merge_variables},
    context::ExecutionContext,
    error::{default_error_handler, Result},
    interpreter::Interpreter,
    materializer::materialize,
};

/// Main application entry point.
fn main() {
    let args = get_args();

    // Logger configuration
    env_logger::Builder::new()
        .filter_level(if args.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Warn
        })
        .init();

    if let Err(err) = run(args) {
        default_error_handler(err);
    }
}

/// # Flow
/// 1. Loads variables from the variables file and `--var` flags
/// 2. Preprocesses, parses and evaluates the tree source
/// 3. Prints the tree in debug mode, otherwise materializes it with the
///    builtin template functions
fn run(args: Args) -> Result<()> {
    let file_vars = match &args.vars_file {
        Some(path) => load_variables_file(path)?,
        None => Default::default(),
    };
    let vars = merge_variables(file_vars, args.vars);

    let interpreter = Interpreter::new(&args.root)
        .with_variables(vars)?
        .permissive(args.allow_undefined_vars);
    let tree = interpreter.interpret_file(&args.source)?;

    if args.debug {
        print!("{}", tree.debug_print());
        return Ok(());
    }

    let context = ExecutionContext::for_source_file(&args.source)
        .with_builtins(interpreter.variables());
    materialize(&tree, &context)?;

    println!("Tree created successfully in {}.", args.root.display());
    Ok(())
}
