// Prompt constants for structured-field extraction. Each template embeds the
// raw source text verbatim via `{text}` replacement; the instruction block is
// fixed so extraction stays deterministic across calls.

/// System prompt for job-posting extraction — enforces JSON-only output.
pub const JOB_EXTRACTION_SYSTEM: &str =
    "You are an expert at extracting structured job information from job descriptions. \
    Always respond with valid JSON.";

/// Job extraction prompt template. Replace `{text}` before sending.
pub const JOB_EXTRACTION_PROMPT_TEMPLATE: &str = r#"Extract job information from the following text and return it as a JSON object with these fields:
- title: Job title (string or null)
- description: Job description (string or null)
- skills: Required skills as an array of strings (array or null)
- experience_level: Experience level required (string or null)
- department: Department/team (string or null)
- location: Job location (string or null)

Rules:
1. Only extract information that is explicitly mentioned in the text
2. If a field is not mentioned or unclear, set it to null
3. For skills, extract individual skills as separate array items
4. For experience_level, use terms like "entry-level", "mid-level", "senior-level", "3+ years", etc.
5. Return ONLY valid JSON, no additional text

Job Description Text:
{text}

JSON Response:
"#;

/// System prompt for candidate extraction — enforces JSON-only output.
pub const CANDIDATE_EXTRACTION_SYSTEM: &str =
    "You are an expert at extracting structured candidate information from resumes and CVs. \
    Always respond with valid JSON.";

/// Candidate extraction prompt template. Replace `{text}` before sending.
pub const CANDIDATE_EXTRACTION_PROMPT_TEMPLATE: &str = r#"Extract candidate information from the following resume/CV text and return it as a JSON object with these fields:
- name: Full name of the candidate (string or null)
- email: Email address (string or null)
- phone: Phone number (string or null)
- skills: Skills and technologies as an array of strings (array or null)
- experience: Work experience summary (string or null)
- education: Educational background (string or null)
- location: Current location (string or null)
- summary: Professional summary or objective (string or null)

Rules:
1. Only extract information that is explicitly mentioned in the text
2. If a field is not mentioned or unclear, set it to null
3. For skills, extract individual skills and technologies as separate array items
4. For experience, provide a brief summary of work history
5. For education, include degrees, institutions, and relevant details
6. Return ONLY valid JSON, no additional text

Resume/CV Text:
{text}

JSON Response:
"#;
