//! Static task catalog: 11 content categories (B-L) with 3 tasks each, plus
//! the standalone speed benchmark (A). Loaded once, never mutated.

use std::fmt;

/// Identifier of the speed benchmark. It is reported separately and excluded
/// from the quality total.
pub const SPEED_CATEGORY: char = 'A';

pub const CATEGORY_LETTERS: [char; 11] = ['B', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J', 'K', 'L'];

pub const TASKS_PER_CATEGORY: u8 = 3;

/// Identity of one task: category letter plus 1-based index within it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId {
    pub category: char,
    pub index: u8,
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.category, self.index)
    }
}

/// Ground truth attached to a task, handed to the judge verbatim.
#[derive(Debug, Clone, Copy)]
pub enum GroundTruth {
    /// No reference material; the judge grades on criteria alone.
    None,
    /// Flat list of facts the response is expected to reflect.
    Facts(&'static [&'static str]),
    /// Statements paired with whether each one is actually true.
    Statements(&'static [(&'static str, bool)]),
}

#[derive(Debug, Clone, Copy)]
pub struct TaskDefinition {
    pub id: TaskId,
    pub name: &'static str,
    pub prompt: &'static str,
    pub task_desc: &'static str,
    pub criteria: &'static str,
    pub ground_truth: GroundTruth,
}

pub fn category_name(letter: char) -> Option<&'static str> {
    match letter {
        'B' => Some("English Quality"),
        'C' => Some("German Quality"),
        'D' => Some("Fact Checking"),
        'E' => Some("Context Extraction"),
        'F' => Some("Logic & Constraints"),
        'G' => Some("Creative Writing"),
        'H' => Some("ELI5 Complexity"),
        'I' => Some("Python Coding"),
        'J' => Some("Customer Support"),
        'K' => Some("Summarization"),
        'L' => Some("Structured Output"),
        _ => None,
    }
}

/// All tasks in execution order.
pub fn tasks() -> &'static [TaskDefinition] {
    &TASKS
}

/// Look up one task. Identifiers must already be upper-cased by the caller.
pub fn lookup(category: char, index: u8) -> Option<&'static TaskDefinition> {
    TASKS
        .iter()
        .find(|t| t.id.category == category && t.id.index == index)
}

pub fn category_tasks(letter: char) -> impl Iterator<Item = &'static TaskDefinition> {
    TASKS.iter().filter(move |t| t.id.category == letter)
}

/// Maximum achievable quality total: 10 points per content category.
/// Derived from the active category count, never hard-coded.
pub fn max_total_score() -> f64 {
    CATEGORY_LETTERS.len() as f64 * 10.0
}

const fn id(category: char, index: u8) -> TaskId {
    TaskId { category, index }
}

static TASKS: [TaskDefinition; 33] = [
    // -------------------- B: English Quality --------------------
    TaskDefinition {
        id: id('B', 1),
        name: "Overdue invoice email",
        prompt: "Write a formal business email reminding a customer of an overdue invoice.\n\nFacts (10 minimum):\n- Invoice number: INV-2024-019\n- Original due date: 15 March 2024\n- Outstanding amount: 1,250 EUR\n- Payment is 30 days overdue\n- Payment method: Bank transfer\n- Customer Name: John Doe\n- Customer Address: 12 Baker Street, London\n- Company Name: ACME Corp.\n- Company Contact Email: finance@acme.com\n- Late fee policy applies after 45 days\n- Currency and decimal format\n\nRequirements:\n- Professional and polite tone\n- Clear subject line\n- Explicit call to action with a deadline\n- No casual language\n- No threats of legal action",
        task_desc: "Formal Business English Email with Explicit Facts (10+)",
        criteria: "Score based on:\n- All facts included correctly (2 points)\n- Professional tone (2 points)\n- Clear subject line (2 points)\n- Explicit deadline/call to action (2 points)\n- Overall quality and polish (2 points)\nDeduct for:\n- Missing or incorrect facts\n- Unprofessional language\n- Missing subject/deadline\n- Redundant wording",
        ground_truth: GroundTruth::None,
    },
    TaskDefinition {
        id: id('B', 2),
        name: "Meeting reschedule email",
        prompt: "Write a short formal email rescheduling a project kickoff meeting.\n\nFacts:\n- Original date: Tuesday 14 May, 10:00\n- New date: Thursday 16 May, 14:30\n- Location changes from Room 4.01 to the main conference room\n- Reason: the client contact, Ms. Patel, is travelling\n- Attendees must confirm by Monday 13 May, 17:00\n- Dial-in details remain unchanged\n\nRequirements:\n- Subject line stating the change\n- Apologetic but concise opening\n- All dates and times stated unambiguously\n- Explicit confirmation request with its deadline",
        task_desc: "Formal rescheduling email with unambiguous dates",
        criteria: "Score based on:\n- All facts present and correct (4 points)\n- Clear subject line naming the change (2 points)\n- Confirmation request with deadline (2 points)\n- Tone and brevity (2 points)\nDeduct for:\n- Wrong or ambiguous dates/times\n- Missing confirmation request\n- Padding or casual phrasing",
        ground_truth: GroundTruth::None,
    },
    TaskDefinition {
        id: id('B', 3),
        name: "Service apology letter",
        prompt: "Write a formal apology letter from a hosting provider to a business customer after a 6-hour outage.\n\nFacts:\n- Outage window: 02:10 to 08:25 UTC on 3 April\n- Cause: failed storage controller in one availability zone\n- Affected service: managed PostgreSQL instances\n- No data was lost\n- A 10% service credit will be applied automatically next billing cycle\n- A full post-mortem will be published within 5 business days\n\nRequirements:\n- Take responsibility without deflecting blame\n- State all facts precisely\n- Describe the concrete remediation steps\n- Professional register throughout, max. 250 words",
        task_desc: "Formal outage apology with precise facts",
        criteria: "Score based on:\n- All facts stated correctly (4 points)\n- Clear ownership of the failure (2 points)\n- Concrete remediation and credit described (2 points)\n- Register and length respected (2 points)\nDeduct for:\n- Vague or missing facts\n- Blame-shifting language\n- Exceeding the word limit substantially",
        ground_truth: GroundTruth::None,
    },
    // -------------------- C: German Quality --------------------
    TaskDefinition {
        id: id('C', 1),
        name: "Zahlungserinnerung",
        prompt: "Verfassen Sie eine formelle Zahlungserinnerung auf Deutsch.\n\nFacts (10+):\n- Rechnungsnummer: RE-77821\n- Rechnungsdatum: 01.02.2024\n- Zahlungsziel: 15.02.2024\n- Betrag: 860 CHF\n- Zahlungsverzug: 45 Tage\n- Firma: Muster GmbH\n- Kunde: Max Mustermann\n- Bankkontodetails: CH93 0076 2011 6238 5295 7\n- Ort: Z\u{fc}rich\n- Mahngeb\u{fc}hren nach 30 Tagen\n- W\u{e4}hrung und Dezimalformat\n\nAnforderungen:\n- Formelle Anrede (Sie)\n- Betreffzeile\n- Klare Zahlungsfrist\n- Sachlicher Ton\n- Keine Umgangssprache",
        task_desc: "Formelle deutsche Mahnung (10+ Fakten)",
        criteria: "Score based on:\n- All facts included correctly (3 points)\n- Formal German (Sie-Anrede) (2 points)\n- Clear subject line (2 points)\n- Proper deadline (2 points)\n- Grammar and style (1 point)\nDeduct for:\n- Informal language\n- Missing facts\n- Missing subject/deadline\n- Grammar errors",
        ground_truth: GroundTruth::None,
    },
    TaskDefinition {
        id: id('C', 2),
        name: "Absageschreiben",
        prompt: "Verfassen Sie ein h\u{f6}fliches, formelles Absageschreiben auf eine Bewerbung.\n\nFacts:\n- Position: Senior Entwicklerin / Senior Entwickler Backend\n- Bewerberin: Frau Dr. Anna Schneider\n- Bewerbung eingegangen am 12.03.2024\n- Firma: Nordwind Software AG, Hamburg\n- Grund: Entscheidung f\u{fc}r eine Person mit mehr Domänenerfahrung\n- Unterlagen werden gem\u{e4}\u{df} DSGVO nach 6 Monaten gel\u{f6}scht\n\nAnforderungen:\n- Durchg\u{e4}ngig Sie-Anrede\n- Wertsch\u{e4}tzender, sachlicher Ton\n- Keine Floskeln wie \"Wir w\u{fc}nschen alles Gute auf Ihrem weiteren Weg\" ohne Kontext\n- Max. 180 W\u{f6}rter",
        task_desc: "Formelle deutsche Bewerbungsabsage",
        criteria: "Score based on:\n- All facts included correctly (3 points)\n- Formal register and Sie-Anrede (3 points)\n- Respectful, non-generic phrasing (2 points)\n- Grammar and length (2 points)\nDeduct for:\n- Informal or generic boilerplate\n- Missing DSGVO notice\n- Grammar errors",
        ground_truth: GroundTruth::None,
    },
    TaskDefinition {
        id: id('C', 3),
        name: "Terminbest\u{e4}tigung",
        prompt: "Schreiben Sie eine formelle Terminbest\u{e4}tigung per E-Mail auf Deutsch.\n\nFacts:\n- Termin: Montag, 05.08.2024, 09:30 Uhr\n- Ort: Kanzlei Berger & Partner, Leopoldstra\u{df}e 12, M\u{fc}nchen\n- Gespr\u{e4}chspartner: Herr Rechtsanwalt Berger\n- Thema: Pr\u{fc}fung eines Mietvertrags\n- Mitzubringen: Vertragsentwurf und Personalausweis\n- Bei Verhinderung: Absage mindestens 24 Stunden vorher\n\nAnforderungen:\n- Betreffzeile mit Datum\n- Sie-Anrede, sachlicher Ton\n- Alle Fakten korrekt und vollst\u{e4}ndig",
        task_desc: "Formelle deutsche Terminbest\u{e4}tigung",
        criteria: "Score based on:\n- All facts present and correct (4 points)\n- Subject line with date (2 points)\n- Formal register (2 points)\n- Grammar and clarity (2 points)\nDeduct for:\n- Missing facts\n- Informal phrasing\n- Grammar errors",
        ground_truth: GroundTruth::None,
    },
    // -------------------- D: Fact Checking --------------------
    TaskDefinition {
        id: id('D', 1),
        name: "History & science facts",
        prompt: "Evaluate each statement as CORRECT or FALSE and justify briefly:\n\n1. The Berlin Wall was built in 1961.\n2. The Berlin Wall fell in 1989.\n3. Water boils at a lower temperature at higher atmospheric pressure.\n4. Napoleon lost the Battle of Waterloo.\n5. Switzerland is a member of the EU.\n6. Isaac Newton developed the law of universal gravitation.\n7. The Earth is not a perfect sphere.\n8. Albert Einstein won the Nobel Prize in Physics in 1921.\n9. Mount Everest is the highest mountain on Earth.\n10. The UN was founded in 1945.",
        task_desc: "Strict Multi-Fact Checking (10 Facts)",
        criteria: "Score based on:\n- Correct true/false judgment for each fact (1 point each, 10 total)\nDeduct for:\n- Incorrect judgment\n- Poor reasoning\n- Unnecessary verbosity",
        ground_truth: GroundTruth::Statements(&[
            ("The Berlin Wall was built in 1961.", true),
            ("The Berlin Wall fell in 1989.", true),
            (
                "Water boils at a lower temperature at higher atmospheric pressure.",
                false,
            ),
            ("Napoleon lost the Battle of Waterloo.", true),
            ("Switzerland is a member of the EU.", false),
            ("Isaac Newton developed the law of universal gravitation.", true),
            ("The Earth is not a perfect sphere.", true),
            ("Albert Einstein won the Nobel Prize in Physics in 1921.", true),
            ("Mount Everest is the highest mountain on Earth.", true),
            ("The UN was founded in 1945.", true),
        ]),
    },
    TaskDefinition {
        id: id('D', 2),
        name: "Geography & nature facts",
        prompt: "Evaluate each statement as CORRECT or FALSE and justify briefly:\n\n1. The Amazon is the longest river in Europe.\n2. Australia is both a country and a continent.\n3. The Sahara is the largest hot desert on Earth.\n4. Canberra is the capital of Australia.\n5. Sharks are mammals.\n6. The Pacific is the largest ocean.\n7. Iceland has active volcanoes.\n8. The Great Barrier Reef lies off the coast of Brazil.\n9. Photosynthesis produces oxygen.\n10. Antarctica is the coldest continent.",
        task_desc: "Strict Multi-Fact Checking (10 Facts)",
        criteria: "Score based on:\n- Correct true/false judgment for each fact (1 point each, 10 total)\nDeduct for:\n- Incorrect judgment\n- Poor reasoning\n- Unnecessary verbosity",
        ground_truth: GroundTruth::Statements(&[
            ("The Amazon is the longest river in Europe.", false),
            ("Australia is both a country and a continent.", true),
            ("The Sahara is the largest hot desert on Earth.", true),
            ("Canberra is the capital of Australia.", true),
            ("Sharks are mammals.", false),
            ("The Pacific is the largest ocean.", true),
            ("Iceland has active volcanoes.", true),
            ("The Great Barrier Reef lies off the coast of Brazil.", false),
            ("Photosynthesis produces oxygen.", true),
            ("Antarctica is the coldest continent.", true),
        ]),
    },
    TaskDefinition {
        id: id('D', 3),
        name: "Computing facts",
        prompt: "Evaluate each statement as CORRECT or FALSE and justify briefly:\n\n1. HTTP stands for HyperText Transfer Protocol.\n2. RAM retains its contents after power loss.\n3. The first version of Linux was released in the 1990s.\n4. An IPv4 address consists of 128 bits.\n5. SQL is used to query relational databases.\n6. A compiler translates source code before execution.\n7. TLS encrypts traffic between client and server.\n8. Moore's law is a physical law of nature.\n9. Git was originally created by Linus Torvalds.\n10. A byte consists of eight bits.",
        task_desc: "Strict Multi-Fact Checking (10 Facts)",
        criteria: "Score based on:\n- Correct true/false judgment for each fact (1 point each, 10 total)\nDeduct for:\n- Incorrect judgment\n- Poor reasoning\n- Unnecessary verbosity",
        ground_truth: GroundTruth::Statements(&[
            ("HTTP stands for HyperText Transfer Protocol.", true),
            ("RAM retains its contents after power loss.", false),
            ("The first version of Linux was released in the 1990s.", true),
            ("An IPv4 address consists of 128 bits.", false),
            ("SQL is used to query relational databases.", true),
            ("A compiler translates source code before execution.", true),
            ("TLS encrypts traffic between client and server.", true),
            ("Moore's law is a physical law of nature.", false),
            ("Git was originally created by Linus Torvalds.", true),
            ("A byte consists of eight bits.", true),
        ]),
    },
    // -------------------- E: Context Extraction --------------------
    TaskDefinition {
        id: id('E', 1),
        name: "Meeting transcript",
        prompt: "Meeting Transcript:\nAlex: Project X finished by Friday.\nSarah: API fix, need documentation from Tom.\nTom: On vacation until Monday.\nAlex: Bernd takes over documentation until Wednesday.\nBernd: Server Error 500.\nAlex: Next meeting Thursday 14:00.\n\nCreate:\n1. Task list with responsible persons and deadlines\n2. Open issues with impacts\n3. Next meeting time\nAt least 10 specific points should be extracted.",
        task_desc: "Information Extraction (10+ Facts)",
        criteria: "Score based on:\n- All facts extracted correctly (5 points)\n- Good structure/organization (3 points)\n- Complete deadlines and responsibilities (2 points)\nDeduct for:\n- Missing facts\n- Poor structure\n- Incomplete information",
        ground_truth: GroundTruth::Facts(&[
            "Project X must be finished by Friday",
            "Alex is responsible for Project X",
            "Sarah is working on an API fix",
            "The API fix needs documentation from Tom",
            "Tom is on vacation until Monday",
            "Bernd takes over the documentation",
            "Documentation deadline is Wednesday",
            "Bernd reported a server error 500",
            "The server error is an open issue",
            "The next meeting is Thursday at 14:00",
        ]),
    },
    TaskDefinition {
        id: id('E', 2),
        name: "Support ticket thread",
        prompt: "Ticket thread:\nCustomer (Mon 09:12): Checkout fails with error PAY-504 since Saturday. We lose roughly 2,000 EUR per day.\nAgent (Mon 10:05): Escalated to payments team, ticket PAY-1123.\nPayments (Tue 08:40): Root cause is an expired gateway certificate. Fix deployed to staging.\nAgent (Tue 09:15): Production deploy scheduled Wednesday 07:00 CET. Customer will get a 5% credit for March.\n\nExtract:\n1. The problem, its start, and business impact\n2. All ticket numbers, owners, and timestamps\n3. Root cause, fix status, and promised compensation",
        task_desc: "Information Extraction from a support thread",
        criteria: "Score based on:\n- All facts extracted correctly (5 points)\n- Clear grouping into problem/ownership/resolution (3 points)\n- No invented details (2 points)\nDeduct for:\n- Missing or wrong facts\n- Hallucinated details\n- Poor structure",
        ground_truth: GroundTruth::Facts(&[
            "Checkout fails with error PAY-504",
            "The failure started on Saturday",
            "Impact is roughly 2,000 EUR per day",
            "The issue was escalated to the payments team",
            "The escalation ticket is PAY-1123",
            "Root cause is an expired gateway certificate",
            "A fix was deployed to staging on Tuesday",
            "Production deploy is scheduled Wednesday 07:00 CET",
            "The customer gets a 5% credit for March",
        ]),
    },
    TaskDefinition {
        id: id('E', 3),
        name: "Travel itinerary",
        prompt: "Itinerary notes:\nFlight LX 318 departs Zurich 07:55, lands London City 08:40 local. Hotel: The Gate, 11 Finsbury Square, check-in from 14:00. Client workshop at Canary Wharf 10:30-16:00, host: Priya N. Dinner reservation 19:30 at Luca (confirmation #88213). Return flight LX 325 Thursday 18:10.\n\nProduce a structured day plan listing every time, place, person, and reference number, in chronological order.",
        task_desc: "Information Extraction from itinerary notes",
        criteria: "Score based on:\n- Every time, place, person, and reference extracted (5 points)\n- Correct chronological ordering (3 points)\n- Concise structure (2 points)\nDeduct for:\n- Missing or altered details\n- Wrong order\n- Verbose padding",
        ground_truth: GroundTruth::Facts(&[
            "Flight LX 318 departs Zurich at 07:55",
            "LX 318 lands at London City at 08:40 local time",
            "Hotel is The Gate, 11 Finsbury Square",
            "Hotel check-in is from 14:00",
            "The client workshop is at Canary Wharf from 10:30 to 16:00",
            "The workshop host is Priya N.",
            "Dinner is at 19:30 at Luca",
            "The dinner confirmation number is 88213",
            "Return flight LX 325 departs Thursday at 18:10",
        ]),
    },
    // -------------------- F: Logic & Constraints --------------------
    TaskDefinition {
        id: id('F', 1),
        name: "School timetable",
        prompt: "Create a complete timetable for two classes 1A, 2B.\n\nTeachers:\n- M\u{fc}ller: Math, Mon/Tue only\n- Meier: German, Tue-Thu\n- Schmidt: Sports, Mon-Fri\n\nRooms:\n- R101: 08:00-10:00 only\n- R102: all day\n\nSubjects: Math 2x per week, German 2x, Sports 1x per class.\nNo double bookings for teachers or rooms.\nAt least 10 different constraints must be correctly fulfilled.",
        task_desc: "Constraint Satisfaction / Timetable (10+ Facts)",
        criteria: "Score based on:\n- All constraints satisfied (6 points)\n- Complete timetable (2 points)\n- No contradictions (2 points)\nDeduct heavily for:\n- Rule violations\n- Incomplete schedule\n- Contradictions",
        ground_truth: GroundTruth::None,
    },
    TaskDefinition {
        id: id('F', 2),
        name: "Shift roster",
        prompt: "Build a weekend on-call roster for four engineers: Ana, Ben, Chloe, Dev.\n\nConstraints:\n- Two shifts per day (Sat/Sun): day (08:00-20:00) and night (20:00-08:00)\n- Nobody works two shifts in a row\n- Nobody works both nights\n- Ana is unavailable Saturday\n- Dev cannot work nights\n- Everyone gets at least one shift\n\nOutput the full roster and, for each constraint, one line showing it is satisfied.",
        task_desc: "Constraint Satisfaction / Shift roster",
        criteria: "Score based on:\n- All constraints satisfied (6 points)\n- Complete roster covering all four shifts (2 points)\n- Verification lines present and correct (2 points)\nDeduct heavily for:\n- Any constraint violation\n- Missing shifts\n- Contradictory assignments",
        ground_truth: GroundTruth::None,
    },
    TaskDefinition {
        id: id('F', 3),
        name: "Seating plan",
        prompt: "Arrange six dinner guests (Ada, Boris, Carla, David, Emil, Fatima) around a round table with seats 1-6.\n\nConstraints:\n- Ada and Boris must not sit next to each other\n- Carla must sit directly between two men\n- David sits in seat 1\n- Emil sits directly opposite David\n- Fatima sits next to Emil\n\nGive the final seat assignment and verify each constraint explicitly.",
        task_desc: "Constraint Satisfaction / Seating plan",
        criteria: "Score based on:\n- All constraints satisfied (6 points)\n- Complete assignment of all six seats (2 points)\n- Explicit verification of each constraint (2 points)\nDeduct heavily for:\n- Any violated constraint\n- Unassigned guests\n- Inconsistent reasoning",
        ground_truth: GroundTruth::None,
    },
    // -------------------- G: Creative Writing --------------------
    TaskDefinition {
        id: id('G', 1),
        name: "Cyberpunk-noir opening",
        prompt: "Write the beginning of a story (approx. 200-300 words).\nGenre: Cyberpunk-Noir.\nSetting: A rain-soaked city in the year 2099.\nRequired terms (all must appear):\n- neon umbrella\n- defective replicant\n- coffee machine\n\nThe story must end with a dramatic cliffhanger.",
        task_desc: "Creative Writing: Cyberpunk-Noir with Constraints",
        criteria: "Score based on:\n- All required terms included (3 points)\n- Correct genre/atmosphere (3 points)\n- Dramatic cliffhanger ending (2 points)\n- Good writing style (2 points)\nDeduct for:\n- Missing required terms\n- Wrong genre/atmosphere\n- No cliffhanger\n- Poor writing style",
        ground_truth: GroundTruth::None,
    },
    TaskDefinition {
        id: id('G', 2),
        name: "Two-sentence horror",
        prompt: "Write exactly two sentences of horror fiction.\n\nRequired elements:\n- A lighthouse\n- The phrase \"still counting\"\n- The horror must come from implication, not gore\n\nBoth sentences together must not exceed 60 words.",
        task_desc: "Creative Writing: Two-sentence horror with constraints",
        criteria: "Score based on:\n- Exactly two sentences (2 points)\n- All required elements present (3 points)\n- Genuine unease through implication (3 points)\n- Economy of language within the limit (2 points)\nDeduct for:\n- Wrong sentence count\n- Missing elements\n- Explicit gore instead of implication",
        ground_truth: GroundTruth::None,
    },
    TaskDefinition {
        id: id('G', 3),
        name: "Product fable",
        prompt: "Write a short fable (120-180 words) in the style of Aesop that teaches why backups matter.\n\nRequired elements:\n- Two animal characters with opposing habits\n- A single concrete catastrophe\n- A one-line moral at the end starting with \"Moral:\"\n\nNo technical jargon; the computing lesson must stay metaphorical.",
        task_desc: "Creative Writing: Aesop-style fable with constraints",
        criteria: "Score based on:\n- Fable structure with two opposing characters (3 points)\n- Clear metaphorical catastrophe (2 points)\n- Moral line present and apt (3 points)\n- Style and length respected (2 points)\nDeduct for:\n- Technical jargon\n- Missing moral\n- Length violations",
        ground_truth: GroundTruth::None,
    },
    // -------------------- H: ELI5 Complexity --------------------
    TaskDefinition {
        id: id('H', 1),
        name: "Quantum entanglement",
        prompt: "Explain the scientific concept of 'Quantum Entanglement' to an 8-year-old child.\n\nRequirements:\n- No complex technical terms without simple explanation\n- Use an analogy with toys or everyday objects\n- Max. 150 words\n- The tone must be child-friendly and engaging",
        task_desc: "Technical Simplification (ELI5): Quantum Entanglement",
        criteria: "Score based on:\n- Understandable for 8-year-old (4 points)\n- Good analogy used (3 points)\n- Correct scientific simplification (2 points)\n- Appropriate tone/length (1 point)\nDeduct for:\n- Too complicated for children\n- Missing analogy\n- Scientific errors\n- Wrong tone or too long",
        ground_truth: GroundTruth::None,
    },
    TaskDefinition {
        id: id('H', 2),
        name: "Inflation",
        prompt: "Explain 'inflation' (the economic concept) to an 8-year-old child.\n\nRequirements:\n- Use an analogy involving pocket money or a candy shop\n- No economics vocabulary without a simple explanation\n- Max. 150 words\n- Child-friendly, engaging tone",
        task_desc: "Technical Simplification (ELI5): Inflation",
        criteria: "Score based on:\n- Understandable for 8-year-old (4 points)\n- Good analogy used (3 points)\n- Correct simplification without errors (2 points)\n- Appropriate tone/length (1 point)\nDeduct for:\n- Jargon without explanation\n- Missing analogy\n- Factual errors\n- Too long",
        ground_truth: GroundTruth::None,
    },
    TaskDefinition {
        id: id('H', 3),
        name: "How DNS works",
        prompt: "Explain how the internet finds a website (DNS) to an 8-year-old child.\n\nRequirements:\n- Use an analogy with a phone book, address book, or asking friends\n- No networking terms without a simple explanation\n- Max. 150 words\n- Child-friendly, engaging tone",
        task_desc: "Technical Simplification (ELI5): DNS",
        criteria: "Score based on:\n- Understandable for 8-year-old (4 points)\n- Good analogy used (3 points)\n- Correct simplification (2 points)\n- Appropriate tone/length (1 point)\nDeduct for:\n- Unexplained jargon\n- Missing analogy\n- Technical errors\n- Too long",
        ground_truth: GroundTruth::None,
    },
    // -------------------- I: Python Coding --------------------
    TaskDefinition {
        id: id('I', 1),
        name: "Password validator",
        prompt: "Write a Python function named 'is_valid_password(pw)' that checks a password.\nCriteria for 'True':\n1. At least 10 characters long\n2. Contains at least one number\n3. Contains at least one special character (e.g. !@#$%^&*)\n4. Contains no spaces\n\nThe function must contain a docstring and show an example call at the end.",
        task_desc: "Python Programming: Password Validation",
        criteria: "Score based on:\n- Correct logic (4 points)\n- All criteria checked (4 points)\n- Docstring included (1 point)\n- Example included (1 point)\nDeduct for:\n- Logical errors\n- Missing criteria\n- Missing docstring/example\n- Poor naming/syntax",
        ground_truth: GroundTruth::None,
    },
    TaskDefinition {
        id: id('I', 2),
        name: "Flatten nested lists",
        prompt: "Write a Python function 'flatten(items)' that flattens arbitrarily nested lists into a single flat list.\n\nRequirements:\n1. Handles any nesting depth\n2. Leaves non-list elements (ints, strings) untouched\n3. Does not mutate the input\n4. Includes a docstring and at least two example calls with expected output as comments",
        task_desc: "Python Programming: recursive list flattening",
        criteria: "Score based on:\n- Correct recursion/iteration over any depth (4 points)\n- Input not mutated (2 points)\n- Handles mixed element types (2 points)\n- Docstring and examples (2 points)\nDeduct for:\n- Infinite recursion risks\n- Mutation of input\n- Missing docstring/examples",
        ground_truth: GroundTruth::None,
    },
    TaskDefinition {
        id: id('I', 3),
        name: "Caesar cipher",
        prompt: "Write a Python function 'caesar(text, shift)' implementing a Caesar cipher.\n\nRequirements:\n1. Shifts letters only; digits, spaces, and punctuation pass through unchanged\n2. Preserves case\n3. Supports negative shifts and shifts larger than 26\n4. Includes a docstring and an example showing that caesar(caesar(s, 5), -5) == s",
        task_desc: "Python Programming: Caesar cipher",
        criteria: "Score based on:\n- Correct shifting with wrap-around (4 points)\n- Case and non-letters preserved (3 points)\n- Negative/large shifts handled (2 points)\n- Docstring and round-trip example (1 point)\nDeduct for:\n- Off-by-one errors\n- Corrupting non-letter characters\n- Missing docstring/example",
        ground_truth: GroundTruth::None,
    },
    // -------------------- J: Customer Support --------------------
    TaskDefinition {
        id: id('J', 1),
        name: "Lost suitcase",
        prompt: "Situation: You are in the customer support of an airline.\nCustomer: 'My suitcase was lost! I'm in Paris and have a wedding tomorrow morning, for which my suit was in the suitcase. This is an absolute catastrophe! What are you doing now?!'\n\nWrite a reply email (max. 200 words).\nRequirements:\n- Respond extremely empathically and de-escalating\n- No standard phrases ('We apologize for the inconvenience') but real empathy\n- Mention concrete next steps (tracking, compensation, emergency purchase option)\n- Maintain professionalism",
        task_desc: "Roleplay / De-escalation: Lost Suitcase",
        criteria: "Score based on:\n- Empathetic response (4 points)\n- Concrete next steps (3 points)\n- No hollow phrases (2 points)\n- Professional style (1 point)\nDeduct for:\n- Defensive or unempathetic\n- No concrete help\n- Using standard phrases\n- Unprofessional style",
        ground_truth: GroundTruth::None,
    },
    TaskDefinition {
        id: id('J', 2),
        name: "Double charge",
        prompt: "Situation: You are in the billing support of a streaming service.\nCustomer: 'You charged me TWICE this month, 14.99 each time. This is theft. Refund me immediately or I'll do a chargeback and post about this everywhere.'\n\nWrite a reply email (max. 180 words).\nRequirements:\n- Acknowledge the error without legalistic hedging\n- State the exact refund amount and a concrete timeframe\n- Explain in one sentence how it will be prevented\n- Stay calm and professional, no threats in return",
        task_desc: "Roleplay / De-escalation: Double billing",
        criteria: "Score based on:\n- Clear acknowledgement and apology (3 points)\n- Exact amount and refund timeframe stated (3 points)\n- Prevention explained briefly (2 points)\n- Calm professional tone (2 points)\nDeduct for:\n- Hedging or blame-shifting\n- Vague refund promises\n- Escalating language",
        ground_truth: GroundTruth::None,
    },
    TaskDefinition {
        id: id('J', 3),
        name: "Launch-day outage",
        prompt: "Situation: You are in the support team of an online game.\nCustomer: 'I took a day off for the launch and your servers have been down for 6 hours. I paid 70 bucks for this. Absolutely pathetic.'\n\nWrite a reply (max. 180 words).\nRequirements:\n- Genuine empathy for the wasted day, no corporate boilerplate\n- Honest status: what is broken and the current ETA\n- Concrete gesture (in-game compensation or partial refund path)\n- Do not promise what support cannot guarantee",
        task_desc: "Roleplay / De-escalation: Launch outage",
        criteria: "Score based on:\n- Genuine, specific empathy (4 points)\n- Honest status with ETA (3 points)\n- Concrete compensation gesture (2 points)\n- No unkeepable promises (1 point)\nDeduct for:\n- Boilerplate phrases\n- Vague status\n- Overpromising",
        ground_truth: GroundTruth::None,
    },
    // -------------------- K: Summarization --------------------
    TaskDefinition {
        id: id('K', 1),
        name: "Press release summary",
        prompt: "Summarize the following press release in exactly 3 bullet points (max. 20 words each):\n\n'Helvetia Rail announced today that the night connection Zurich-Barcelona will resume on 12 December 2025 after a six-year pause. Three weekly departures are planned initially, rising to five in summer 2026. Tickets go on sale 1 October 2025 starting at 59 EUR. The route will use refurbished sleeper cars with 2- and 4-berth compartments.'",
        task_desc: "Summarization: press release to 3 bullets",
        criteria: "Score based on:\n- All key facts preserved accurately (5 points)\n- Exactly 3 bullets within the word limit (3 points)\n- No invented details (2 points)\nDeduct for:\n- Wrong dates, numbers, or prices\n- Bullet count or length violations\n- Hallucinated content",
        ground_truth: GroundTruth::Facts(&[
            "The Zurich-Barcelona night connection resumes 12 December 2025",
            "The route was paused for six years",
            "Three weekly departures initially",
            "Five weekly departures from summer 2026",
            "Ticket sales start 1 October 2025",
            "Tickets start at 59 EUR",
            "Refurbished sleeper cars with 2- and 4-berth compartments",
        ]),
    },
    TaskDefinition {
        id: id('K', 2),
        name: "Changelog TL;DR",
        prompt: "Write a 2-sentence TL;DR of this changelog for non-technical users:\n\n'v4.2.0: Reworked sync engine reduces conflict errors by 80%. Files larger than 2 GB now upload in resumable chunks. Fixed a bug where archived projects reappeared after login. Dropped support for Windows 7. The desktop app now requires 64-bit systems.'",
        task_desc: "Summarization: changelog for non-technical users",
        criteria: "Score based on:\n- Captures improvements and breaking changes (4 points)\n- Exactly 2 sentences, plain language (3 points)\n- No technical jargon left unexplained (2 points)\n- Nothing invented (1 point)\nDeduct for:\n- Omitting the dropped Windows 7 support\n- Jargon\n- Sentence count violations",
        ground_truth: GroundTruth::Facts(&[
            "Sync conflict errors reduced by 80%",
            "Files over 2 GB upload in resumable chunks",
            "Archived projects no longer reappear after login",
            "Windows 7 support was dropped",
            "The desktop app now requires 64-bit systems",
        ]),
    },
    TaskDefinition {
        id: id('K', 3),
        name: "Minutes abstract",
        prompt: "Condense these meeting minutes into a single paragraph of at most 60 words:\n\n'Budget review 14 Feb: Marketing spend frozen until Q3. Hiring: two backend roles approved, the data analyst role deferred. Office lease renewal signed through 2027 at unchanged rent. Next review on 11 April. Action: Finance circulates revised forecasts by 21 Feb.'",
        task_desc: "Summarization: minutes to one paragraph",
        criteria: "Score based on:\n- All decisions and dates preserved (5 points)\n- Single paragraph within 60 words (3 points)\n- Neutral, factual register (2 points)\nDeduct for:\n- Missing decisions\n- Wrong dates\n- Length violations",
        ground_truth: GroundTruth::Facts(&[
            "Marketing spend is frozen until Q3",
            "Two backend roles were approved",
            "The data analyst role was deferred",
            "Office lease renewed through 2027 at unchanged rent",
            "Next review is 11 April",
            "Finance circulates revised forecasts by 21 Feb",
        ]),
    },
    // -------------------- L: Structured Output --------------------
    TaskDefinition {
        id: id('L', 1),
        name: "Contact card JSON",
        prompt: "Convert this text into a single JSON object and output ONLY the JSON:\n\n'Dr. Lena Fischer works at Aurora Labs in Basel as Head of Research. Reach her at lena.fischer@auroralabs.ch or +41 61 555 01 23. She joined in March 2019 and leads a team of 12.'\n\nRequired schema: {\"name\": string, \"title\": string, \"company\": string, \"city\": string, \"email\": string, \"phone\": string, \"joined\": string, \"team_size\": number}",
        task_desc: "Structured Output: text to JSON per schema",
        criteria: "Score based on:\n- Output is valid JSON and nothing else (4 points)\n- All schema fields present with correct values (4 points)\n- Correct types (team_size as number) (2 points)\nDeduct for:\n- Prose around the JSON\n- Missing or wrong fields\n- Type errors",
        ground_truth: GroundTruth::Facts(&[
            "name is Dr. Lena Fischer",
            "title is Head of Research",
            "company is Aurora Labs",
            "city is Basel",
            "email is lena.fischer@auroralabs.ch",
            "phone is +41 61 555 01 23",
            "joined is March 2019",
            "team_size is 12",
        ]),
    },
    TaskDefinition {
        id: id('L', 2),
        name: "Inventory CSV",
        prompt: "Convert this stock report into CSV with the header 'sku,name,quantity,price_eur' and output ONLY the CSV:\n\n'We have 14 units of the Nimbus keyboard (SKU KB-201) at 79.90 EUR. The Stratus mouse, SKU MS-114, is down to 3 units at 29.50 EUR. Of the Cirrus USB hub (HUB-550) there are 27 units priced 18.00 EUR.'",
        task_desc: "Structured Output: prose to CSV",
        criteria: "Score based on:\n- Exact header and one row per product (4 points)\n- All values correct (4 points)\n- No surrounding prose or markdown fences (2 points)\nDeduct for:\n- Wrong column order\n- Altered numbers\n- Extra commentary",
        ground_truth: GroundTruth::Facts(&[
            "KB-201 Nimbus keyboard, 14 units, 79.90 EUR",
            "MS-114 Stratus mouse, 3 units, 29.50 EUR",
            "HUB-550 Cirrus USB hub, 27 units, 18.00 EUR",
        ]),
    },
    TaskDefinition {
        id: id('L', 3),
        name: "Event schedule table",
        prompt: "Render this schedule as a Markdown table with columns Time, Session, Speaker, Room - and output ONLY the table:\n\n'The conference opens at 09:00 with a keynote by Maria Gomez in the Main Hall. At 10:30, \"Rust in Production\" with Jan Kovac runs in Room B. Lunch is 12:00 in the Atrium (no speaker). The closing panel with all speakers starts 16:00 in the Main Hall.'",
        task_desc: "Structured Output: prose to Markdown table",
        criteria: "Score based on:\n- Valid Markdown table with the four required columns (4 points)\n- All four rows with correct values (4 points)\n- No text outside the table (2 points)\nDeduct for:\n- Broken table syntax\n- Missing rows\n- Invented details",
        ground_truth: GroundTruth::Facts(&[
            "09:00 keynote by Maria Gomez in the Main Hall",
            "10:30 Rust in Production with Jan Kovac in Room B",
            "12:00 lunch in the Atrium with no speaker",
            "16:00 closing panel with all speakers in the Main Hall",
        ]),
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn catalog_has_three_tasks_per_category() {
        for letter in CATEGORY_LETTERS {
            let count = category_tasks(letter).count();
            assert_eq!(count, 3, "category {letter} has {count} tasks");
        }
        assert_eq!(tasks().len(), 33);
    }

    #[test]
    fn lookup_is_total_over_the_catalog() {
        for letter in CATEGORY_LETTERS {
            for index in 1..=TASKS_PER_CATEGORY {
                let task = lookup(letter, index);
                assert!(task.is_some(), "missing task {letter}{index}");
                assert_eq!(task.unwrap().id, TaskId { category: letter, index });
            }
        }
    }

    #[test]
    fn lookup_rejects_unknown_ids() {
        assert!(lookup('A', 1).is_none());
        assert!(lookup('Z', 1).is_none());
        assert!(lookup('B', 0).is_none());
        assert!(lookup('B', 4).is_none());
    }

    #[test]
    fn task_ids_are_unique() {
        let ids: HashSet<String> = tasks().iter().map(|t| t.id.to_string()).collect();
        assert_eq!(ids.len(), tasks().len());
    }

    #[test]
    fn task_id_display_format() {
        assert_eq!(TaskId { category: 'B', index: 2 }.to_string(), "B2");
    }

    #[test]
    fn max_total_tracks_category_count() {
        assert_eq!(max_total_score(), 110.0);
    }

    #[test]
    fn fact_checking_carries_statement_truth_pairs() {
        for task in category_tasks('D') {
            match task.ground_truth {
                GroundTruth::Statements(pairs) => assert_eq!(pairs.len(), 10),
                _ => panic!("fact-checking task {} lacks statements", task.id),
            }
        }
    }

    #[test]
    fn extraction_tasks_carry_flat_fact_lists() {
        for task in category_tasks('E') {
            assert!(matches!(task.ground_truth, GroundTruth::Facts(_)));
        }
    }

    #[test]
    fn every_category_has_a_name() {
        for letter in CATEGORY_LETTERS {
            assert!(category_name(letter).is_some());
        }
        assert!(category_name(SPEED_CATEGORY).is_none());
        assert!(category_name('x').is_none());
    }
}
