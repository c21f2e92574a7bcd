use crate::core::config::data::{path_display, Config};

impl Config {
    pub fn print_all(&self) {
        println!("Current configuration:");
        println!("  base-url: {}", self.base_url());
        println!("  site-url: {}", self.site_url());
        println!("  site-name: {}", self.site_name());
        let retry = self.retry_policy();
        println!("  max-retries: {}", retry.max_retries);
        println!(
            "  initial-retry-delay-ms: {}",
            retry.initial_delay.as_millis()
        );
        println!("  render-cache-capacity: {}", self.render_cache_capacity());
        match self.data_dir() {
            Some(dir) => println!("  data-dir: {}", path_display(dir)),
            None => println!("  data-dir: (unavailable)"),
        }
    }
}
