use std::env;

const DEFAULT_CATALOG_URL: &str =
    "https://chaabiv2.s3.ap-south-1.amazonaws.com/hiring/bigBasketProducts.csv";
const DEFAULT_INDEX_ENDPOINT: &str = "http://localhost:6333/index";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub catalog_url: String,
    pub index_endpoint: String,
    pub encoder: EncoderConfig,
    pub qa: QaConfig,
}

#[derive(Debug, Clone)]
pub struct EncoderConfig {
    pub model_path: String,
    pub tokenizer_path: String,
    pub dimensions: usize,
    pub max_length: usize,
}

#[derive(Debug, Clone)]
pub struct QaConfig {
    pub model_path: String,
    pub tokenizer_path: String,
    pub max_length: usize,
    pub max_answer_tokens: usize,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let catalog_url = env::var("CATALOG_URL")
            .unwrap_or_else(|_| DEFAULT_CATALOG_URL.to_string());

        let index_endpoint = env::var("VECTOR_INDEX_URL")
            .unwrap_or_else(|_| DEFAULT_INDEX_ENDPOINT.to_string());

        Self {
            catalog_url,
            index_endpoint,
            encoder: EncoderConfig::from_env(),
            qa: QaConfig::from_env(),
        }
    }
}

impl EncoderConfig {
    pub fn from_env() -> Self {
        Self {
            model_path: env::var("ENCODER_MODEL_PATH")
                .unwrap_or_else(|_| "models/bert-base-uncased/model.onnx".to_string()),
            tokenizer_path: env::var("ENCODER_TOKENIZER_PATH")
                .unwrap_or_else(|_| "models/bert-base-uncased/tokenizer.json".to_string()),
            dimensions: env_usize("ENCODER_DIMENSIONS", 768),
            max_length: env_usize("ENCODER_MAX_LENGTH", 512),
        }
    }
}

impl QaConfig {
    pub fn from_env() -> Self {
        Self {
            model_path: env::var("QA_MODEL_PATH")
                .unwrap_or_else(|_| "models/roberta-base-squad2/model.onnx".to_string()),
            tokenizer_path: env::var("QA_TOKENIZER_PATH")
                .unwrap_or_else(|_| "models/roberta-base-squad2/tokenizer.json".to_string()),
            max_length: env_usize("QA_MAX_LENGTH", 384),
            max_answer_tokens: env_usize("QA_MAX_ANSWER_TOKENS", 30),
        }
    }
}

fn env_usize(name: &str, default: usize) -> usize {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
