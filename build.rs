// build.rs: selects the decode-loop configuration for the target.
//
// Emits `cargo:rustc-cfg=fast_dec_loop` on targets where the wide-stripe fast
// loop pays off (x86, x86_64, aarch64).  Everywhere else only the
// bounds-checked safe loop is compiled.  The `safe-loop-only` feature turns
// the fast loop off on every target.
fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rustc-check-cfg=cfg(fast_dec_loop)");

    if std::env::var_os("CARGO_FEATURE_SAFE_LOOP_ONLY").is_some() {
        return;
    }

    let target_arch = std::env::var("CARGO_CFG_TARGET_ARCH").unwrap_or_default();
    let fast_targets = ["x86", "x86_64", "aarch64"];
    if fast_targets.contains(&target_arch.as_str()) {
        println!("cargo:rustc-cfg=fast_dec_loop");
    }
}
