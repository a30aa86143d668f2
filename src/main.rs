//! amc - Algorithmic marching cubes
//!
//! Generates the case table, fills a demo field, extracts its isosurface and
//! reports on the result. Everything is driven by `config/` and `AMC_*`
//! environment variables.

use std::error::Error;
use std::time::Instant;

use amc::config::AppConfig;
use amc::export::save_obj;
use amc::scene::build_scene;
use amc_cases::{CaseTable, CASE_COUNT};
use amc_core::ScalarField;
use amc_mesh::{MeshBuilder, MeshCapacity, UsageStats};

fn main() {
    // Load configuration before logging so the configured level applies
    let loaded = AppConfig::load();
    let level = loaded
        .as_ref()
        .map(|config| config.debug.log_level.clone())
        .unwrap_or_else(|_| "info".to_string());
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
    log::info!("Starting amc");

    let config = loaded.unwrap_or_else(|e| {
        log::warn!("Failed to load config: {}. Using defaults.", e);
        AppConfig::default()
    });

    if let Err(e) = run(&config) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(config: &AppConfig) -> Result<(), Box<dyn Error>> {
    let start = Instant::now();
    let table = CaseTable::build()?;
    log::info!(
        "Case table ready: {} triangles over {} cases, {} with caps ({:?})",
        table.total_triangles(),
        CASE_COUNT,
        table.capped_case_count(),
        start.elapsed()
    );

    if let Some(path) = &config.output.case_table_path {
        table.save_ron(path)?;
        log::info!("Wrote case table to {}", path.display());
    }

    let field = build_scene(&config.scene, config.field.size)?;
    let capacity = MeshCapacity::new(config.mesh.max_vertices, config.mesh.max_triangles);
    let mut builder = MeshBuilder::new(&table);
    let mut stats = UsageStats::new();

    let start = Instant::now();
    let mesh = builder.build_with_stats(&field, capacity, &mut stats);
    log::info!(
        "Extracted {} vertices and {} triangles from a {:?} field ({:?})",
        mesh.vertex_count(),
        mesh.triangle_count(),
        field.size(),
        start.elapsed()
    );
    log::info!(
        "Closed: {}, consistently oriented: {}, boundary edges: {}",
        mesh.is_closed(),
        mesh.is_consistently_oriented(),
        mesh.boundary_edge_count()
    );

    if let Some(cell) = config.debug.inspect_cell {
        match builder.inspect_cell(&field, cell) {
            Some(inspection) => {
                println!(
                    "Cell {:?}: code {} ({} triangles)",
                    inspection.cell,
                    inspection.code,
                    inspection.triangles.len()
                );
                for triangle in &inspection.triangles {
                    println!("  {:?} normal {:?}", triangle.positions, triangle.normals[0]);
                }
            }
            None => log::warn!("Cell {:?} is outside the field", cell),
        }
    }

    if let Some(path) = &config.output.obj_path {
        save_obj(&mesh, path)?;
    }

    if config.output.usage_stats {
        print!("{}", stats.report(&table));
        for (code, count) in stats.most_used(5) {
            println!("case {:3}: {} cells", code, count);
        }
    }

    Ok(())
}
