use rad_adapters::{catalog_from_json, load_processor_spec};
use rad_core::{BuildEngine, InMemoryArchive, InMemoryTaskQueue, SessionOutcome};

fn main() {
    // Cargar .env si existe (IMAGEDIR, RUST_LOG, etc.)
    let _ = dotenvy::dotenv();
    // CLI mínima:
    //   rad-cli build --processor <YAML> --catalog <JSON> [--include <GLOB>] [--imagedir <DIR>]
    //   rad-cli parse --processor <YAML> [--imagedir <DIR>]
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        eprintln!("usage: rad-cli <build|parse> --processor <YAML> [--catalog <JSON>] [--include <GLOB>] [--imagedir <DIR>]");
        std::process::exit(2);
    }

    let mut processor: Option<String> = None;
    let mut catalog: Option<String> = None;
    let mut includes: Vec<String> = Vec::new();
    let mut imagedir: Option<String> = std::env::var("IMAGEDIR").ok();
    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--processor" => {
                i += 1;
                if i < args.len() { processor = Some(args[i].clone()); }
            }
            "--catalog" => {
                i += 1;
                if i < args.len() { catalog = Some(args[i].clone()); }
            }
            "--include" => {
                i += 1;
                if i < args.len() { includes.push(args[i].clone()); }
            }
            "--imagedir" => {
                i += 1;
                if i < args.len() { imagedir = Some(args[i].clone()); }
            }
            _ => {}
        }
        i += 1;
    }

    let Some(processor_path) = processor else {
        eprintln!("[rad-cli] falta --processor");
        std::process::exit(2);
    };

    let yaml_text = match std::fs::read_to_string(&processor_path) {
        Ok(t) => t,
        Err(e) => { eprintln!("[rad-cli] no se pudo leer {processor_path}: {e}"); std::process::exit(3); }
    };
    let spec = match load_processor_spec(&yaml_text, &processor_path, imagedir.as_deref()) {
        Ok(s) => s,
        Err(e) => { eprintln!("[rad-cli] definición inválida: {e}"); std::process::exit(4); }
    };

    match args[1].as_str() {
        "parse" => {
            // Mostrar la definición resuelta y salir.
            match serde_json::to_string_pretty(&spec) {
                Ok(out) => println!("{out}"),
                Err(e) => { eprintln!("[rad-cli] error serializando: {e}"); std::process::exit(5); }
            }
        }
        "build" => {
            let Some(catalog_path) = catalog else {
                eprintln!("[rad-cli] build requiere --catalog");
                std::process::exit(2);
            };
            let catalog_text = match std::fs::read_to_string(&catalog_path) {
                Ok(t) => t,
                Err(e) => { eprintln!("[rad-cli] no se pudo leer {catalog_path}: {e}"); std::process::exit(3); }
            };
            let project = match catalog_from_json(&catalog_text) {
                Ok(c) => c,
                Err(e) => { eprintln!("[rad-cli] catálogo inválido: {e}"); std::process::exit(4); }
            };

            // Pasada local contra puertos en memoria: muestra qué se
            // construiría sin tocar el archivo real.
            let mut engine = BuildEngine::new(InMemoryArchive::new(), InMemoryTaskQueue::new());
            let summary = match engine.build_processor(&spec, &project, &includes) {
                Ok(s) => s,
                Err(e) => { eprintln!("[rad-cli] la pasada falló: {e}"); std::process::exit(5); }
            };

            println!("{}: sessions={} built={} pending={} nodata={} skipped={}",
                     spec.proctype,
                     summary.sessions,
                     summary.built(),
                     summary.pending(),
                     summary.no_data(),
                     summary.already_built());
            for outcome in &summary.outcomes {
                match outcome {
                    SessionOutcome::Built(label) => println!("  RUNNING    {label}"),
                    SessionOutcome::Pending(label) => println!("  PENDING    {label}"),
                    SessionOutcome::NoData(label) => println!("  NO_DATA    {label}"),
                    SessionOutcome::AlreadyBuilt(label) => println!("  BUILT      {label}"),
                }
            }
            let (_, queue) = engine.into_parts();
            for task in queue.submitted() {
                match serde_json::to_string(task) {
                    Ok(line) => println!("task: {line}"),
                    Err(e) => eprintln!("[rad-cli] error serializando task: {e}"),
                }
            }
        }
        other => {
            eprintln!("[rad-cli] subcomando desconocido: {other}");
            std::process::exit(2);
        }
    }
}
