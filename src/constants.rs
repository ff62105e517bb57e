// "Modified" delta feeds, mirrored before the yearly dumps
pub const CVE_XML_12_MODIFIED_URL: &str = "https://nvd.nist.gov/download/nvdcve-Modified.xml.gz";
pub const CVE_XML_20_MODIFIED_URL: &str =
    "https://nvd.nist.gov/feeds/xml/cve/nvdcve-2.0-Modified.xml.gz";
pub const CVE_JSON_10_MODIFIED_URL: &str =
    "https://static.nvd.nist.gov/feeds/json/cve/1.0/nvdcve-1.0-modified.json.gz";

// Yearly feed templates, `{year}` is replaced with a 4-digit year
pub const CVE_XML_12_YEAR_TEMPLATE: &str = "https://nvd.nist.gov/download/nvdcve-{year}.xml.gz";
pub const CVE_XML_20_YEAR_TEMPLATE: &str =
    "https://nvd.nist.gov/feeds/xml/cve/nvdcve-2.0-{year}.xml.gz";
pub const CVE_JSON_10_YEAR_TEMPLATE: &str =
    "https://static.nvd.nist.gov/feeds/json/cve/1.0/nvdcve-1.0-{year}.json.gz";
pub const YEAR_PLACEHOLDER: &str = "{year}";

// Environment variables
pub const ENV_BUCKET_NAME: &str = "BUCKET_NAME";
pub const ENV_START_YEAR: &str = "START_YEAR";
pub const ENV_END_YEAR: &str = "END_YEAR";
pub const ENV_OUTPUT_DIR: &str = "OUTPUT_DIR";
pub const ENV_S3_ENDPOINT: &str = "S3_ENDPOINT";
pub const ENV_S3_REGION: &str = "S3_REGION";

// Defaults
pub const DEFAULT_START_YEAR: i32 = 2002;
pub const DEFAULT_S3_REGION: &str = "us-east-1";

// Suffix of in-flight downloads inside the output directory
pub const PART_FILE_SUFFIX: &str = ".part";
