#[cfg(test)]
pub mod test {
    use jiff::SignedDuration;

    use crate::opt::Opt;
    use crate::registry::Registry;

    /// The three-option registry used by the end-to-end ingest scenarios.
    pub fn ingest_registry() -> Registry {
        Registry::from_opts(ingest_opts()).unwrap()
    }

    pub fn ingest_opts() -> Vec<Opt> {
        vec![
            Opt::bool("ingest.header", true)
                .usage("Treat the first row as a header")
                .source(),
            Opt::string("driver.csv.delim", ",")
                .usage("CSV delimiter")
                .source(),
            Opt::string("driver.xlsx.sheet", "")
                .usage("Worksheet to ingest")
                .source(),
        ]
    }

    /// One descriptor of each kind, plus a couple of aliases.
    pub fn mixed_opts() -> Vec<Opt> {
        vec![
            Opt::int("conn.max-open", 5).short('m').usage("Max open connections"),
            Opt::bool("verbose", false).short('v').usage("Verbose output"),
            Opt::duration("ping.timeout", SignedDuration::from_secs(10))
                .usage("Ping timeout"),
            Opt::string("log.level", "warn").usage("Log level"),
        ]
    }

    #[test]
    fn fixtures_register_cleanly() {
        assert_eq!(ingest_registry().len(), 3);
        assert_eq!(Registry::from_opts(mixed_opts()).unwrap().len(), 4);
    }
}
