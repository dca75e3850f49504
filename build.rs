fn main() {
    // Only the ESP32 build needs the ESP-IDF toolchain environment; host
    // builds (tests, simulation) skip it entirely.
    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
