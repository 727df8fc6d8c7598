//! Benchmark harness: measures scan → locate → extract performance.
//!
//! Run with: cargo bench -p testsmith-cli

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use testsmith_core::{ExtractedFunctions, FunctionTable, SourceUnit};
use testsmith_treesit::{FunctionLocator, extract_all};

fn create_synthetic_repo(file_count: usize, funcs_per_file: usize) -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();

    for i in 0..file_count {
        let pkg = format!("pkg/mod{}", i % 10);
        fs::create_dir_all(root.join(&pkg)).unwrap();

        let mut content = format!("package mod{}\n\ntype Svc{i} struct{{ n int }}\n", i % 10);
        for j in 0..funcs_per_file {
            if j % 3 == 0 {
                content.push_str(&format!(
                    "\nfunc (s *Svc{i}) Method{j}(x int) int {{\n\ts.n += x\n\treturn s.n\n}}\n"
                ));
            } else {
                content.push_str(&format!(
                    "\nfunc Handler{j}(xs []int) int {{\n\ttotal := 0\n\tfor _, x := range xs {{\n\t\ttotal += x * {j}\n\t}}\n\treturn total\n}}\n"
                ));
            }
        }
        fs::write(root.join(format!("{pkg}/file_{i}.go")), content).unwrap();
    }

    dir
}

fn bench_scan(dir: &Path) -> Vec<PathBuf> {
    testsmith_scanner::collect_sources(&[dir.to_path_buf()]).unwrap()
}

fn bench_locate(locator: &FunctionLocator, units: &[SourceUnit]) -> Vec<FunctionTable> {
    units
        .iter()
        .map(|u| locator.locate(&u.text).unwrap())
        .collect()
}

fn bench_extract(units: &[SourceUnit], tables: &[FunctionTable]) -> Vec<ExtractedFunctions> {
    units
        .iter()
        .zip(tables)
        .map(|(u, t)| extract_all(&u.text, t).unwrap())
        .collect()
}

fn run_benchmark(label: &str, file_count: usize, funcs_per_file: usize) {
    let dir = create_synthetic_repo(file_count, funcs_per_file);
    let locator = FunctionLocator::new();
    let iterations = 5;

    // Warmup
    let files = bench_scan(dir.path());
    let units: Vec<SourceUnit> = files.iter().map(|p| SourceUnit::read(p).unwrap()).collect();
    let _ = bench_locate(&locator, &units);

    let start = Instant::now();
    for _ in 0..iterations {
        let _ = bench_scan(dir.path());
    }
    let scan_ms = start.elapsed().as_millis() as f64 / iterations as f64;

    let start = Instant::now();
    for _ in 0..iterations {
        let _ = bench_locate(&locator, &units);
    }
    let locate_ms = start.elapsed().as_millis() as f64 / iterations as f64;

    let tables = bench_locate(&locator, &units);
    let start = Instant::now();
    for _ in 0..iterations {
        let _ = bench_extract(&units, &tables);
    }
    let extract_ms = start.elapsed().as_millis() as f64 / iterations as f64;

    let functions: usize = tables.iter().map(FunctionTable::len).sum();
    let total_ms = scan_ms + locate_ms + extract_ms;

    println!("{label}:");
    println!("  Files:     {file_count}");
    println!("  Functions: {functions}");
    println!("  Scan:      {scan_ms:.1}ms");
    println!("  Locate:    {locate_ms:.1}ms");
    println!("  Extract:   {extract_ms:.1}ms");
    println!("  Total:     {total_ms:.1}ms");
    println!();
}

fn main() {
    println!("Testsmith Pipeline Benchmarks");
    println!("=============================\n");

    run_benchmark("Small project (50 files)", 50, 10);
    run_benchmark("Medium project (200 files)", 200, 20);
    run_benchmark("Large project (1000 files)", 1000, 20);

    println!("Done.");
}
