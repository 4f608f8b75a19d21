use clap::{Parser, ValueEnum};
use measure_core::{FormState, HttpMethod, RequestInput};

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:3000";

#[derive(Parser, Debug, Clone)]
#[command(name = "measure", about = "Send one request to the measurements API", version)]
pub struct Args {
    /// Endpoint path such as /measurements/1, or an absolute URL
    #[arg(default_value = "")]
    pub endpoint: String,

    /// HTTP method
    #[arg(short = 'X', long, value_enum, ignore_case = true, default_value_t = MethodArg::Get)]
    pub method: MethodArg,

    /// Request body, sent for POST and PUT
    #[arg(short = 'd', long, default_value = "")]
    pub body: String,

    /// Server that relative endpoints are resolved against
    #[arg(long, env = "MEASURE_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
#[value(rename_all = "UPPER")]
pub enum MethodArg {
    Get,
    Post,
    Put,
    Delete,
}

impl From<MethodArg> for HttpMethod {
    fn from(method: MethodArg) -> Self {
        match method {
            MethodArg::Get => HttpMethod::Get,
            MethodArg::Post => HttpMethod::Post,
            MethodArg::Put => HttpMethod::Put,
            MethodArg::Delete => HttpMethod::Delete,
        }
    }
}

impl FormState for Args {
    fn read(&self) -> RequestInput {
        RequestInput::new(self.method.into(), self.endpoint.clone(), self.body.clone())
    }
}
