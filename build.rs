use std::env;
use std::path::Path;

fn main() {
    // OpenSSL is required for PKCS#12 decryption and RSA-SHA512 signing
    detect_and_configure_openssl();
}

fn detect_and_configure_openssl() {
    if env::var_os("OPENSSL_DIR").is_some() {
        return;
    }

    // On Windows, point openssl-sys at vcpkg when it is installed; it is the
    // most reliable OpenSSL source there.
    if cfg!(target_os = "windows") {
        if let Some(vcpkg_root) = env::var_os("VCPKG_ROOT") {
            let installed = Path::new(&vcpkg_root).join("installed").join("x64-windows");
            if installed.join("include").join("openssl").exists() {
                println!("cargo:rustc-env=OPENSSL_DIR={}", installed.display());
                return;
            }
        }
        println!("cargo:warning=OpenSSL not found; install it via vcpkg (vcpkg install openssl:x64-windows) or set OPENSSL_DIR");
        return;
    }

    // Unix systems resolve system OpenSSL through pkg-config inside
    // openssl-sys; nothing to configure here.
}
