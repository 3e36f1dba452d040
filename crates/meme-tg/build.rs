fn main() {
    vergen::EmitBuilder::builder()
        .build_timestamp()
        .git_sha(false)
        .cargo_target_triple()
        .emit()
        .unwrap();
}
